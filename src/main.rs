use chrono::{Duration, Utc};
use sigmill::config::EngineConfig;
use sigmill::db::MemorySignalStore;
use sigmill::lifecycle::SignalProcessor;
use sigmill::models::RawMessage;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    sigmill::logging::init_logging();

    let store = Arc::new(MemorySignalStore::new());
    let processor = SignalProcessor::new(EngineConfig::default(), store.clone());

    let now = Utc::now();

    let new_signal = RawMessage {
        channel_id: -1001,
        message_id: 1,
        text: "XAUUSD BUY\nEntry: 2040.50 - 2042.00\nSL: 2030.00\nTP1: 2050.00\nTP2: 2060.00"
            .to_string(),
        is_edit: false,
        received_at: now,
    };
    println!("New message:");
    println!("  {:?}", processor.process(&new_signal).await?);
    println!();

    let rebroadcast = RawMessage {
        channel_id: -1002,
        message_id: 77,
        text: "GOLD BUY Entry 2040.50-2042.00 SL 2030.00 TP 2050.00 2060.00".to_string(),
        is_edit: false,
        received_at: now + Duration::seconds(2),
    };
    println!("Same signal relayed by another channel 2s later:");
    println!("  {:?}", processor.process(&rebroadcast).await?);
    println!();

    let edit = RawMessage {
        channel_id: -1001,
        message_id: 1,
        text: "XAUUSD BUY\nEntry: 2040.50 - 2042.00\nSL: 2032.00\nTP1: 2052.00\nTP2: 2062.00"
            .to_string(),
        is_edit: true,
        received_at: now + Duration::seconds(30),
    };
    println!("Edit revising the prices:");
    println!("  {:?}", processor.process(&edit).await?);
    println!();

    let chatter = RawMessage {
        channel_id: -1001,
        message_id: 2,
        text: "Great call yesterday, gold looking strong!".to_string(),
        is_edit: false,
        received_at: now + Duration::seconds(40),
    };
    println!("Ordinary chatter:");
    println!("  {:?}", processor.process(&chatter).await?);
    println!();

    println!("Store contents:");
    for record in store.all() {
        println!(
            "  #{} {} {} entry {}-{} sl {} tp1 {} status {}",
            record.id,
            record.symbol,
            record.direction,
            record.entry_min,
            record.entry_max,
            record.stop_loss,
            record.take_profit_1,
            record.status
        );
    }

    Ok(())
}
