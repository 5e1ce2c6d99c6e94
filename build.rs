fn main() {
    // ESP-IDF link arguments are only needed for the target binary; host
    // builds (tests, simulation) skip them.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
