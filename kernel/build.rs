use std::env;

// 只有裸机目标需要链接脚本，宿主机上的测试直接使用默认链接方式
fn main() {
    println!("cargo:rerun-if-changed=src/linker.ld");
    println!("cargo:rerun-if-changed=src/asm/entry.S");
    println!("cargo:rerun-if-changed=src/asm/enter_user.S");
    println!("cargo:rustc-check-cfg=cfg(board)");
    let target_os = env::var("CARGO_CFG_TARGET_OS").unwrap_or_default();
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();
    if target_os == "none" && target_arch == "riscv64" {
        let dir = env::var("CARGO_MANIFEST_DIR").unwrap();
        println!("cargo:rustc-cfg=board");
        println!("cargo:rustc-link-arg-bins=-T{}/src/linker.ld", dir);
    }
}
