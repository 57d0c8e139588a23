use crate::error::{KernelError, KernelResult};

// 用户程序区域 [base, base + len)
// 加载器只能通过这里带边界检查的接口写内存
pub struct UserRegion<'a> {
    base: u64,
    mem: &'a mut [u8],
}

impl<'a> UserRegion<'a> {
    pub fn new(base: u64, mem: &'a mut [u8]) -> Self {
        return Self { base, mem };
    }

    /// Wraps `len` bytes of physical memory starting at `base`.
    ///
    /// # Safety
    ///
    /// `[base, base + len)` must be RAM that nothing else references for
    /// the lifetime `'a`. This is the only place the loader touches raw
    /// addresses.
    pub unsafe fn from_raw(base: u64, len: usize) -> Self {
        let mem = core::slice::from_raw_parts_mut(base as usize as *mut u8, len);
        return Self { base, mem };
    }

    #[inline]
    pub fn base(&self) -> u64 {
        return self.base;
    }

    #[inline]
    pub fn len(&self) -> u64 {
        return self.mem.len() as u64;
    }

    #[inline]
    pub fn end(&self) -> u64 {
        return self.base + self.len();
    }

    // [addr, addr + size) 是否完全落在区域内
    pub fn contains(&self, addr: u64, size: u64) -> bool {
        if addr < self.base {
            return false;
        }
        match addr.checked_add(size) {
            Some(end) => end <= self.end(),
            None => false,
        }
    }

    fn range(&self, addr: u64, size: usize) -> KernelResult<core::ops::Range<usize>> {
        if !self.contains(addr, size as u64) {
            return Err(KernelError::RegionViolation {
                start: addr,
                end: addr.saturating_add(size as u64),
            });
        }
        let start = (addr - self.base) as usize;
        return Ok(start..start + size);
    }

    pub fn write(&mut self, addr: u64, data: &[u8]) -> KernelResult<()> {
        let range = self.range(addr, data.len())?;
        self.mem[range].copy_from_slice(data);
        return Ok(());
    }

    pub fn zero(&mut self, addr: u64, size: usize) -> KernelResult<()> {
        let range = self.range(addr, size)?;
        self.mem[range].fill(0);
        return Ok(());
    }

    pub fn read(&self, addr: u64, size: usize) -> KernelResult<&[u8]> {
        let range = self.range(addr, size)?;
        return Ok(&self.mem[range]);
    }
}
