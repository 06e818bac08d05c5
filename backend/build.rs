use std::fs;
use std::path::Path;

// Embeds the browser bundle when it has been built (`trunk build` in ../frontend).
// `include_dir!` in main.rs fails to compile on a missing directory, so
// `static/dist` is created even when there is no bundle; the relay then serves
// the API alone.
fn main() {
    let out_dir = Path::new("static");
    let dist_dir = Path::new("../frontend/dist");

    if dist_dir.exists() {
        let _ = fs::remove_dir_all(out_dir);
        fs::create_dir_all(out_dir).expect("create static dir");
        fs_extra::dir::copy(
            dist_dir,
            out_dir,
            &fs_extra::dir::CopyOptions::new().overwrite(true).copy_inside(true),
        )
            .expect("copy frontend bundle");
    }
    fs::create_dir_all(out_dir.join("dist")).expect("create static/dist");

    println!("cargo:rerun-if-changed=../frontend/dist");
    println!("cargo:rerun-if-changed=build.rs");
}
