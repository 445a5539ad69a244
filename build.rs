fn main() {
    println!("cargo:rerun-if-env-changed=HUMETRON_CONFIG");

    // ESP-IDF environment is only needed for the device build.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
