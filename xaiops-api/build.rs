//! Build script for xaiops-api

fn main() {
    xaiops_build::emit_build_info();
}
