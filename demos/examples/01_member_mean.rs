use coalesce_demos::common::coalescer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Build the coalescer (mock providers in CI when COALESCE_DEMOS_USE_MOCK is set).
    let coalescer = coalescer()?;

    // 2. Average the member's coverage fields across every provider.
    println!("Coalescing member 1 across {} providers...", coalescer.providers().len());
    let averaged = coalescer.coalesce("1").await?;

    // 3. Print the result.
    for (field, value) in &averaged {
        println!("{field:>12}: {value}");
    }

    Ok(())
}
