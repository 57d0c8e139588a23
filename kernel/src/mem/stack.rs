use crate::config::{user_stack_position, MAX_USER_STACKS};
use crate::error::{KernelError, KernelResult, Resource};

const BITMAP_WORDS: usize = (MAX_USER_STACKS + 63) / 64;

// 用户栈槽位，base = USER_STACK_BASE + index * USER_STACK_SIZE
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackSlot {
    pub index: usize,
    pub bottom: u64,
    pub top: u64,
}

// 用户栈分配器，每个二进制位表示一个栈槽是否已被占用
// 没有回收接口：槽位一旦分配，即使进程退出也一直保持占用
pub struct StackAllocator {
    bits: [u64; BITMAP_WORDS],
    capacity: usize,
}

impl StackAllocator {
    pub const fn new() -> Self {
        return Self::with_capacity(MAX_USER_STACKS);
    }

    pub const fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity > MAX_USER_STACKS { MAX_USER_STACKS } else { capacity };
        return Self {
            bits: [0; BITMAP_WORDS],
            capacity,
        };
    }

    // 找到第一个空闲槽位并标记占用，栈向下增长，所以初始sp为槽位顶端
    pub fn allocate(&mut self) -> KernelResult<StackSlot> {
        let capacity = self.capacity;
        let found = self
            .bits
            .iter_mut()
            .enumerate()
            .find_map(|(idx, word)| {
                let offset = word.trailing_ones() as usize; // 第一个0
                let index = idx * 64 + offset;
                if offset == 64 || index >= capacity {
                    return None;
                }
                *word |= 1u64 << offset;
                return Some(index);
            });
        let index = found.ok_or(KernelError::ResourceExhausted(Resource::StackSlot))?;
        let (bottom, top) = user_stack_position(index);
        return Ok(StackSlot { index, bottom, top });
    }

    pub fn is_used(&self, index: usize) -> bool {
        if index >= self.capacity {
            return false;
        }
        return self.bits[index / 64] & (1u64 << (index % 64)) != 0;
    }

    pub fn used(&self) -> usize {
        return self.bits.iter().map(|w| w.count_ones() as usize).sum();
    }

    pub fn capacity(&self) -> usize {
        return self.capacity;
    }
}
