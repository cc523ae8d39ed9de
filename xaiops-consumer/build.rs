//! Build script for xaiops-consumer

fn main() {
    xaiops_build::emit_build_info();
}
