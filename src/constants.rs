pub const MAX_BATCH_BYTES: usize = 5 * 1024 * 1024;
pub const DELIVERY_MAX_RETRIES: u64 = 5;
pub const DELIVERY_BASE_DELAY_MS: u64 = 500;
pub const REQUEST_TIMEOUT_SECS: u64 = 30;
pub const ERROR_BODY_PREVIEW_CHARS: usize = 1024;

pub const DEFAULT_SERVER: &str = "127.0.0.1:8731";
