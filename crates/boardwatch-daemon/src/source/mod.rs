pub mod export_dir;

pub use export_dir::ExportDirSource;
