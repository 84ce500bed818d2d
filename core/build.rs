// Embedded UI lives in ui/dist; include_dir does not track it on stable, so rerun on change.

fn main() {
    let dist = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("ui")
        .join("dist");
    if !dist.join("index.html").exists() {
        println!("cargo:warning=ui/dist/index.html is missing; the window will show 404");
    }
    println!("cargo:rerun-if-changed=../ui/dist");
}
