//! ELF64 little-endian RISC-V images.
//!
//! The identification block and the program header table bounds are checked
//! here first so every defect maps to the right error. Decoding is then left
//! to the `elf` crate. Section headers are not consumed.

use crate::error::{KernelError, KernelResult};
use bitflags::bitflags;
use elf::abi::{
    EI_CLASS, EI_DATA, ELFCLASS64, ELFDATA2LSB, ELFMAG0, ELFMAG1, ELFMAG2, ELFMAG3, EM_RISCV,
    PT_LOAD,
};
use elf::endian::{EndianParse, LittleEndian};
use elf::segment::ProgramHeader as RawProgramHeader;
use elf::{ElfBytes, ParseError};

pub const EHDR_SIZE: usize = 64;
pub const PHDR_SIZE: usize = 56;

// Elf64_Ehdr 中预检查用到的字段偏移
const E_MACHINE: usize = 18;
const E_PHOFF: usize = 32;
const E_PHENTSIZE: usize = 54;
const E_PHNUM: usize = 56;

bitflags! {
    pub struct SegmentFlags: u32 {
        const X = 1;
        const W = 1 << 1;
        const R = 1 << 2;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgramHeader {
    pub p_type: u32,
    pub flags: SegmentFlags,
    pub offset: u64,
    pub vaddr: u64,
    pub paddr: u64,
    pub filesz: u64,
    pub memsz: u64,
    pub align: u64,
}

impl ProgramHeader {
    #[inline]
    pub fn is_load(&self) -> bool {
        return self.p_type == PT_LOAD;
    }

    fn raw(&self) -> RawProgramHeader {
        return RawProgramHeader {
            p_type: self.p_type,
            p_offset: self.offset,
            p_vaddr: self.vaddr,
            p_paddr: self.paddr,
            p_filesz: self.filesz,
            p_memsz: self.memsz,
            p_flags: self.flags.bits(),
            p_align: self.align,
        };
    }
}

impl From<RawProgramHeader> for ProgramHeader {
    fn from(raw: RawProgramHeader) -> Self {
        return Self {
            p_type: raw.p_type,
            flags: SegmentFlags::from_bits_truncate(raw.p_flags),
            offset: raw.p_offset,
            vaddr: raw.p_vaddr,
            paddr: raw.p_paddr,
            filesz: raw.p_filesz,
            memsz: raw.p_memsz,
            align: raw.p_align,
        };
    }
}

// 校验过的ELF视图，程序头表保证完全落在data内
pub struct ElfFile<'a> {
    elf: ElfBytes<'a, LittleEndian>,
}

impl<'a> ElfFile<'a> {
    pub fn parse(data: &'a [u8]) -> KernelResult<Self> {
        precheck(data)?;
        let elf = ElfBytes::<LittleEndian>::minimal_parse(data).map_err(malformed)?;
        if elf.ehdr.e_phnum > 0 && elf.segments().is_none() {
            return Err(KernelError::Format("missing program header table"));
        }
        return Ok(Self { elf });
    }

    #[inline]
    pub fn entry(&self) -> u64 {
        return self.elf.ehdr.e_entry;
    }

    // 按表中顺序产出程序头
    pub fn program_headers(&self) -> impl Iterator<Item = ProgramHeader> + 'a {
        return self
            .elf
            .segments()
            .into_iter()
            .flatten()
            .map(ProgramHeader::from);
    }

    // 段在文件中的数据，越界时返回Bounds
    pub fn segment_data(&self, ph: &ProgramHeader) -> KernelResult<&'a [u8]> {
        return self
            .elf
            .segment_data(&ph.raw())
            .map_err(|_| KernelError::Bounds("segment truncated"));
    }
}

// 顺序：大小、magic、class/endian、machine、程序头表范围、表项大小
fn precheck(data: &[u8]) -> KernelResult<()> {
    if data.len() < EHDR_SIZE {
        return Err(KernelError::Format("file too small"));
    }
    if data[..4] != [ELFMAG0, ELFMAG1, ELFMAG2, ELFMAG3] {
        return Err(KernelError::Format("not ELF"));
    }
    if data[EI_CLASS] != ELFCLASS64 || data[EI_DATA] != ELFDATA2LSB {
        return Err(KernelError::Format("wrong ELF class/endian"));
    }
    if field(data, E_MACHINE, LittleEndian::parse_u16_at)? != EM_RISCV {
        return Err(KernelError::Format("not RISC-V ELF"));
    }
    let phoff = field(data, E_PHOFF, LittleEndian::parse_u64_at)?;
    let phentsize = field(data, E_PHENTSIZE, LittleEndian::parse_u16_at)?;
    let phnum = field(data, E_PHNUM, LittleEndian::parse_u16_at)?;
    let table_end = phoff.checked_add(phnum as u64 * phentsize as u64);
    match table_end {
        Some(end) if end <= data.len() as u64 => {}
        _ => return Err(KernelError::Bounds("phdrs out of range")),
    }
    if phnum > 0 && phentsize as usize != PHDR_SIZE {
        return Err(KernelError::Format("bad program header entry size"));
    }
    return Ok(());
}

fn field<T>(
    data: &[u8],
    at: usize,
    parse: fn(LittleEndian, &mut usize, &[u8]) -> Result<T, ParseError>,
) -> KernelResult<T> {
    let mut offset = at;
    return parse(LittleEndian, &mut offset, data).map_err(malformed);
}

fn malformed(_: ParseError) -> KernelError {
    return KernelError::Format("malformed ELF header");
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use alloc::vec::Vec;

    pub struct Segment {
        pub p_type: u32,
        pub offset: u64,
        pub vaddr: u64,
        pub filesz: u64,
        pub memsz: u64,
    }

    impl Segment {
        pub fn load(offset: u64, vaddr: u64, filesz: u64, memsz: u64) -> Self {
            return Self { p_type: PT_LOAD, offset, vaddr, filesz, memsz };
        }
    }

    // 构造一个最小ELF：header + 程序头表，payload接在表后面
    pub fn build_image(entry: u64, segments: &[Segment], payload: &[u8]) -> Vec<u8> {
        let mut image = Vec::new();
        image.extend_from_slice(&[ELFMAG0, ELFMAG1, ELFMAG2, ELFMAG3, ELFCLASS64, ELFDATA2LSB, 1, 0]);
        image.extend_from_slice(&[0; 8]);
        image.extend_from_slice(&2u16.to_le_bytes()); // ET_EXEC
        image.extend_from_slice(&EM_RISCV.to_le_bytes());
        image.extend_from_slice(&1u32.to_le_bytes());
        image.extend_from_slice(&entry.to_le_bytes());
        image.extend_from_slice(&(EHDR_SIZE as u64).to_le_bytes());
        image.extend_from_slice(&0u64.to_le_bytes());
        image.extend_from_slice(&0u32.to_le_bytes());
        image.extend_from_slice(&(EHDR_SIZE as u16).to_le_bytes());
        image.extend_from_slice(&(PHDR_SIZE as u16).to_le_bytes());
        image.extend_from_slice(&(segments.len() as u16).to_le_bytes());
        image.extend_from_slice(&[0; 6]);
        for seg in segments {
            image.extend_from_slice(&seg.p_type.to_le_bytes());
            image.extend_from_slice(&(SegmentFlags::R | SegmentFlags::X).bits().to_le_bytes());
            image.extend_from_slice(&seg.offset.to_le_bytes());
            image.extend_from_slice(&seg.vaddr.to_le_bytes());
            image.extend_from_slice(&seg.vaddr.to_le_bytes());
            image.extend_from_slice(&seg.filesz.to_le_bytes());
            image.extend_from_slice(&seg.memsz.to_le_bytes());
            image.extend_from_slice(&8u64.to_le_bytes());
        }
        image.extend_from_slice(payload);
        return image;
    }
}
