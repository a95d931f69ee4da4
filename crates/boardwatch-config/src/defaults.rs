//! Hardcoded fallback values for every optional setting.

pub(crate) fn refresh_interval_secs() -> u64 {
    300
}

pub(crate) fn sweep_interval_secs() -> u64 {
    30
}

pub(crate) fn request_timeout_secs() -> u64 {
    30
}

pub(crate) fn auto_switch() -> bool {
    true
}

pub(crate) fn auto_switch_delay_ms() -> u64 {
    1000
}
