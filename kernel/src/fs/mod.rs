use crate::error::{KernelError, KernelResult};

mod catalog;

pub use catalog::builtin;

// 编译期内置的只读文件，整个内核生命周期内不会被修改或释放
#[derive(Clone, Copy)]
pub struct FileBuffer {
    pub name: &'static str,
    pub data: &'static [u8],
}

impl FileBuffer {
    pub const fn new(name: &'static str, data: &'static [u8]) -> Self {
        return Self { name, data };
    }

    #[inline]
    pub fn len(&self) -> usize {
        return self.data.len();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.data.is_empty();
    }
}

// 文件存储接口，按名字查找文件
pub trait FileStore {
    fn lookup(&self, name: &str) -> Option<&FileBuffer>;
    fn files(&self) -> &[FileBuffer];

    fn open(&self, name: &str) -> KernelResult<&FileBuffer> {
        return self.lookup(name).ok_or(KernelError::NotFound);
    }
}

// 静态文件目录
pub struct StaticFs {
    files: &'static [FileBuffer],
}

impl StaticFs {
    pub const fn new(files: &'static [FileBuffer]) -> Self {
        return Self { files };
    }
}

impl FileStore for StaticFs {
    fn lookup(&self, name: &str) -> Option<&FileBuffer> {
        return self.files.iter().find(|f| f.name == name);
    }

    fn files(&self) -> &[FileBuffer] {
        return self.files;
    }
}
