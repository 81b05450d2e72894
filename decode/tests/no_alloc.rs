use std::{
    alloc::{GlobalAlloc, Layout, System},
    sync::atomic::{AtomicUsize, Ordering},
};

use or1k_decode::or1k;

struct CountingAlloc;

static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { System.alloc(layout) };
        if !ptr.is_null() {
            ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) };
    }
}

#[global_allocator]
static GLOBAL: CountingAlloc = CountingAlloc;

#[test]
fn decode_and_extract_do_not_allocate() {
    // Compile the tables before counting
    let tables = or1k();
    let words = [0x9C64_0010u32, 0xD7E1_4FFC, 0xC040_1A34, 0x1C00_0000, 0x1500_0000];

    ALLOCATIONS.store(0, Ordering::Relaxed);

    let mut operands = 0;
    for _ in 0..1_000 {
        for &raw in &words {
            if let Some(index) = tables.decode(raw) {
                operands += tables.extract(raw, index).len();
            }
        }
    }

    assert_eq!(operands, 1_000 * (3 + 2 + 3 + 1));
    assert_eq!(ALLOCATIONS.load(Ordering::Relaxed), 0, "decoder allocated on the hot path");
}
