use std::error::Error;

use buddy_sim::{BuddyAllocator, DEFAULT_CAPACITY};
use tracing::{info, warn, Level};

/// Pool capacity from the first argument, in KB
fn capacity() -> Result<usize, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(arg) => Ok(arg.parse()?),
        None => Ok(DEFAULT_CAPACITY),
    }
}

fn allocate(pool: &mut BuddyAllocator, request: usize) {
    match pool.allocate(request) {
        Ok(handle) => println!("Allocated {}KB.", handle.size()),
        Err(err) => warn!("{err}"),
    }
}

fn free(pool: &mut BuddyAllocator, size: usize) {
    match pool.free_by_size(size) {
        Ok(()) => println!("Freed {size}KB."),
        Err(err) => warn!(size, "{err}"),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();

    let mut pool = BuddyAllocator::new(capacity()?)?;
    info!(capacity = pool.capacity(), "pool created");
    print!("{pool}");

    println!("\nStep 1: Allocate 100KB");
    allocate(&mut pool, 100);
    print!("{pool}");

    println!("\nStep 2: Allocate 200KB");
    allocate(&mut pool, 200);
    print!("{pool}");

    println!("\nStep 3: Free 128KB");
    free(&mut pool, 128);
    print!("{pool}");

    println!("\nStep 4: Free 256KB");
    free(&mut pool, 256);
    print!("{pool}");

    let stats = pool.stats();
    info!(
        free = stats.free,
        blocks = stats.block_count,
        "simulation finished"
    );
    Ok(())
}
