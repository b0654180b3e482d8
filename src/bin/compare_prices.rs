//! Utility to compare shelf prices from the command line
//!
//! Usage: compare_prices PRICE AMOUNT UNIT PRICE AMOUNT UNIT [...]

use upm::pricing::{rank, round_cents, Candidate, Quantity, Unit};

fn parse_number(text: &str, what: &str, position: usize) -> Result<f64, String> {
    text.trim()
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| format!("Product {}: {} '{}' is not a number", position, what, text))
}

fn parse_candidates(args: &[String]) -> Result<Vec<Candidate>, Box<dyn std::error::Error>> {
    if args.is_empty() || args.len() % 3 != 0 {
        return Err("Expected PRICE AMOUNT UNIT triples, e.g. compare_prices 100 1 kg 60 500 g".into());
    }

    let mut candidates = Vec::with_capacity(args.len() / 3);
    for (index, triple) in args.chunks(3).enumerate() {
        let position = index + 1;
        let price = parse_number(&triple[0], "price", position)?;
        let amount = parse_number(&triple[1], "amount", position)?;
        let unit: Unit = triple[2].parse()?;

        candidates.push(Candidate {
            id: position.to_string(),
            name: format!("Product {}", position),
            brand: String::new(),
            quantity: Quantity::new(price, amount, unit)?,
        });
    }

    Ok(candidates)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let candidates = parse_candidates(&args)?;
    let ranked = rank(&candidates)?;

    println!("Compared {} products:", candidates.len());
    for (position, entry) in ranked.ordered.iter().enumerate() {
        let candidate = &candidates[entry.input_index];
        let quantity = candidate.quantity;
        let badge = if ranked.is_winner(&entry.id) { "  <- best" } else { "" };

        println!(
            "  {}. {}: {:.2} for {} {} = {:.2}/{}{}",
            position + 1,
            candidate.name,
            quantity.price,
            quantity.amount,
            quantity.unit,
            round_cents(entry.unit_price),
            quantity.unit.family().base_unit(),
            badge
        );
    }

    println!(
        "\nSaves {:.2} per unit ({:.1}%) versus the most expensive",
        round_cents(ranked.savings_amount),
        ranked.savings_percent
    );

    Ok(())
}
