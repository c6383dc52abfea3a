//! Binding generator for the badge core, Kotlin for the Android app unless swift is asked for

fn main() {
    let wants_swift = std::env::args().any(|arg| arg.to_lowercase().contains("swift"));

    if wants_swift {
        uniffi::uniffi_bindgen_swift();
    } else {
        uniffi::uniffi_bindgen_main();
    }
}
