use super::{FileBuffer, StaticFs};

const README: &[u8] = b"Tiny RISC-V OS demo file.\nUse 'cat README'.\nTry 'load hello'.\n";

// hello：链接在USER_BASE的RISC-V ELF64程序，一个LOAD段（R+X，memsz 0x100）
// 轮询UART THR空闲后逐字节输出问候语，然后ret回到加载器
//
//   lui   t0, 0x10000       ; UART0
//   auipc t1, 0
//   addi  t1, t1, 44        ; msg
// 1:lbu   t2, 0(t1)
//   beqz  t2, 3f
// 2:lbu   t3, 5(t0)         ; LSR
//   andi  t3, t3, 0x20
//   beqz  t3, 2b
//   sb    t2, 0(t0)         ; THR
//   addi  t1, t1, 1
//   j     1b
// 3:ret
#[rustfmt::skip]
const HELLO: &[u8] = &[
    // ELF header
    0x7f, 0x45, 0x4c, 0x46, 0x02, 0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x02, 0x00, 0xf3, 0x00, 0x01, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x20, 0x80, 0x00, 0x00, 0x00, 0x00, 0x40, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x05, 0x00, 0x00, 0x00, 0x40, 0x00, 0x38, 0x00, 0x01, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00,
    // program header
                            0x01, 0x00, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00,
    0x78, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x80,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x20, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x58, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    // .text
    0xb7, 0x02, 0x00, 0x10, 0x17, 0x03, 0x00, 0x00, 0x13, 0x03, 0xc3, 0x02,
    0x83, 0x43, 0x03, 0x00, 0x63, 0x8e, 0x03, 0x00, 0x03, 0xce, 0x52, 0x00,
    0x13, 0x7e, 0x0e, 0x02, 0xe3, 0x0c, 0x0e, 0xfe, 0x23, 0x80, 0x72, 0x00,
    0x13, 0x03, 0x13, 0x00, 0x6f, 0xf0, 0x5f, 0xfe, 0x67, 0x80, 0x00, 0x00,
    // "Hello from user program at 0x80200000!\n"
    0x48, 0x65, 0x6c, 0x6c, 0x6f, 0x20, 0x66, 0x72, 0x6f, 0x6d, 0x20, 0x75,
    0x73, 0x65, 0x72, 0x20, 0x70, 0x72, 0x6f, 0x67, 0x72, 0x61, 0x6d, 0x20,
    0x61, 0x74, 0x20, 0x30, 0x78, 0x38, 0x30, 0x32, 0x30, 0x30, 0x30, 0x30,
    0x30, 0x21, 0x0a, 0x00,
];

static FILES: [FileBuffer; 2] = [
    FileBuffer::new("README", README),
    FileBuffer::new("hello", HELLO),
];

pub fn builtin() -> StaticFs {
    return StaticFs::new(&FILES);
}
