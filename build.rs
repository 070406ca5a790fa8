use chrono::Utc;

fn main() {
    // Stamp build time for the health endpoint / ヘルスエンドポイント用のビルド時刻
    let build_time = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);

    println!("cargo:rerun-if-changed=build.rs");
}
