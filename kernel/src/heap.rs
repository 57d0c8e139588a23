use buddy_system_allocator::LockedHeap;
use rvload::config::KERNEL_HEAP_SIZE;

// 必须为mut，否则会被编译器分配到rodata只读段
static mut HEAP: [u8; KERNEL_HEAP_SIZE] = [0; KERNEL_HEAP_SIZE];

#[global_allocator]
pub static ALLOCATOR: LockedHeap = LockedHeap::new();

pub fn init() {
    unsafe {
        let start = core::ptr::addr_of_mut!(HEAP) as usize;
        ALLOCATOR.lock().init(start, KERNEL_HEAP_SIZE);
    }
}
