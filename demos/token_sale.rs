//! Token Sale
//!
//! A crowdsale guarded by a state machine:
//! - contributions are only accepted while the sale is open
//! - the sale closes by itself once the cap is reached (conditional transition)
//! - closing pays out the raised funds (entry callback)
//! - a checkpoint lets the sale resume after a restart
//!
//! Run with: cargo run --example token_sale

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use waypoint::{state_ids, EntryCallback, FsmError, MachineBuilder, StateMachine};

state_ids! {
    SETUP,
    SALE_OPEN,
    SALE_CLOSED,
    FINALIZED,
}

const CONTRIBUTE: &str = "contribute";
const WITHDRAW: &str = "withdraw";
const CAP: u64 = 1_000;

struct Sale {
    machine: StateMachine,
    raised: Arc<AtomicU64>,
}

impl Sale {
    fn contribute(&mut self, amount: u64) -> Result<(), FsmError> {
        // Cap may have been hit since the last call.
        self.machine.settle()?;
        self.machine.check_and_enter(CONTRIBUTE)?;
        self.raised.fetch_add(amount, Ordering::SeqCst);
        self.machine.settle()?;
        Ok(())
    }

    fn withdraw(&mut self) -> Result<u64, FsmError> {
        let raised = Arc::clone(&self.raised);
        self.machine
            .gated(WITHDRAW, move || raised.swap(0, Ordering::SeqCst))
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Token Sale Example ===\n");

    let raised = Arc::new(AtomicU64::new(0));
    let cap_reader = Arc::clone(&raised);
    let payout_reader = Arc::clone(&raised);

    let machine = MachineBuilder::new()
        .states([SETUP, SALE_OPEN, SALE_CLOSED, FINALIZED])
        .allow(SALE_OPEN, CONTRIBUTE)
        .allow(SALE_CLOSED, WITHDRAW)
        .when(SALE_OPEN, SALE_CLOSED, move || {
            cap_reader.load(Ordering::SeqCst) >= CAP
        })
        .on_enter(SALE_CLOSED, move || {
            println!(
                "  [callback] sale closed with {} raised",
                payout_reader.load(Ordering::SeqCst)
            );
        })
        .build()?;

    let mut sale = Sale { machine, raised };

    println!("State: {}", sale.machine.current_state());
    match sale.contribute(100) {
        Err(err) => println!("  Rejected during setup: {err}"),
        Ok(()) => println!("  Unexpectedly accepted"),
    }

    sale.machine.advance()?;
    println!("\nState: {}", sale.machine.current_state());
    for amount in [300, 400, 300] {
        sale.contribute(amount)?;
        println!("  Contributed {amount}, now in {}", sale.machine.current_state());
    }

    if let Err(err) = sale.contribute(50) {
        println!("  Rejected after cap: {err}");
    }

    println!("\nCheckpointing before withdrawal");
    let json = sale.machine.checkpoint().to_json()?;
    let restored = StateMachine::restore(waypoint::Checkpoint::from_json(&json)?)?;
    println!("  Restored machine in {}", restored.current_state());

    let paid = sale.withdraw()?;
    println!("  Withdrew {paid}");

    sale.machine.set_callback(
        FINALIZED,
        EntryCallback::new(|| println!("  [callback] sale finalized")),
    )?;
    sale.machine.advance()?;

    println!("\nPath:");
    for state in sale.machine.history().get_path() {
        println!("  {state}");
    }

    Ok(())
}
