use vergen::{vergen, Config};

fn main() {
    // trigger recompilation when a new migration is added
    println!("cargo:rerun-if-changed=migrations");

    // The git SHA is only available when building from a checkout. Without
    // it the Sentry release name falls back to the crate version.
    if vergen(Config::default()).is_err() {
        println!("cargo:warning=vergen could not determine git metadata");
    }
}
