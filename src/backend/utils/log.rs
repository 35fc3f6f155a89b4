// Canister debug log. On wasm the lines go to the replica log through `ic_cdk`;
// host builds write them to stderr so unit tests can exercise logging paths.

#[doc(hidden)]
pub fn emit(line: String) {
    #[cfg(target_arch = "wasm32")]
    ic_cdk::println!("{}", line);
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{}", line);
}

#[doc(hidden)]
pub fn emit_err(line: String) {
    #[cfg(target_arch = "wasm32")]
    ic_cdk::eprintln!("{}", line);
    #[cfg(not(target_arch = "wasm32"))]
    eprintln!("{}", line);
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::utils::log::emit(format!("📝 INFO: {}", format_args!($($arg)*)))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::utils::log::emit(format!("⚠️ WARN: {}", format_args!($($arg)*)))
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        $crate::utils::log::emit_err(format!("🔥 ERROR: {}", format_args!($($arg)*)))
    };
}

#[macro_export]
macro_rules! log_scheduler {
    ($($arg:tt)*) => {
        $crate::utils::log::emit(format!("⚙️ SCHEDULER: {}", format_args!($($arg)*)))
    };
}
