// src/macros.rs
#[macro_export]
macro_rules! s {
    // Empty cell / empty buffer
    () => {
        ::std::string::String::new()
    };
    // Literal, const or &str variable into an owned String
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}
