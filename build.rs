fn main() {
    // Peer host for the boot-time state fetch is baked in at build time.
    println!("cargo:rerun-if-env-changed=RELAYS_PEER_HOST");

    embuild::espidf::sysenv::output();
}
