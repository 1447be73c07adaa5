fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // ESP-IDF sysenv (linker args, sdkconfig) only exists for firmware builds.
    #[cfg(feature = "espidf")]
    embuild::espidf::sysenv::output();
}
