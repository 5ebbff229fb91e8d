//! Global Stack Usage Example
//!
//! Configures the process-wide stack from the environment before first use,
//! then shares it between threads.

use std::thread;

use stackdev::prelude::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Process-Wide Stack Usage ===\n");

    // Must run before the first global_stack() call, which would otherwise
    // build the stack from StackConfig::default()
    let config = StackConfig::from_env()?;
    let stack = init_global_stack(&config)?;
    println!("Global stack capacity: {} units", stack.capacity());

    let workers: Vec<_> = (0..4)
        .map(|id| {
            thread::spawn(move || {
                with_global_stack(|stack| stack.push(id)).and_then(|pushed| pushed)
            })
        })
        .collect();
    for worker in workers {
        if let Ok(Err(err)) = worker.join() {
            println!("  push failed: {err}");
        }
    }

    let stack = global_stack()?;
    println!("Stored after workers: {:?}", stack.snapshot());

    let drained = read_bytes(stack, stack.len() * UNIT_WIDTH)?;
    println!("Drained {} bytes, stack now holds {} units", drained.len(), stack.len());

    Ok(())
}
