use super::elf::{ElfFile, ProgramHeader};
use crate::error::{KernelError, KernelResult};
use crate::mem::UserRegion;

// 加载结果：入口地址和已复制的LOAD段数
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadedImage {
    pub entry: u64,
    pub segments: usize,
}

// 复制单个LOAD段：先完成全部检查，再写入filesz字节并把剩余部分清零（BSS）
pub fn load_segment(elf: &ElfFile, ph: &ProgramHeader, region: &mut UserRegion) -> KernelResult<()> {
    let src = elf.segment_data(ph)?;
    if !region.contains(ph.vaddr, ph.memsz) {
        return Err(KernelError::RegionViolation {
            start: ph.vaddr,
            end: ph.vaddr.saturating_add(ph.memsz),
        });
    }
    if ph.memsz < ph.filesz {
        return Err(KernelError::Format("segment memsz < filesz"));
    }
    region.write(ph.vaddr, src)?;
    region.zero(ph.vaddr + ph.filesz, (ph.memsz - ph.filesz) as usize)?;
    return Ok(());
}

// 按表中顺序加载所有LOAD段，其他类型忽略
// 第k个段失败时中止，但不回滚前k-1个段已经写入的内容
pub fn load_segments(elf: &ElfFile, region: &mut UserRegion) -> KernelResult<usize> {
    let mut loaded = 0;
    for ph in elf.program_headers().filter(|ph| ph.is_load()) {
        load_segment(elf, &ph, region)?;
        debug!(
            "loader: segment {:#x}..{:#x} filesz={:#x} flags={:?}",
            ph.vaddr,
            ph.vaddr + ph.memsz,
            ph.filesz,
            ph.flags
        );
        loaded += 1;
    }
    return Ok(loaded);
}

// 校验ELF并把段放入用户区域
pub fn load_image(data: &[u8], region: &mut UserRegion) -> KernelResult<LoadedImage> {
    let elf = ElfFile::parse(data)?;
    let segments = load_segments(&elf, region)?;
    return Ok(LoadedImage { entry: elf.entry(), segments });
}
