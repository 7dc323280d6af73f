use std::io::Write;

use anyhow::Result;
use swap_core::common::format_euros;
use swap_core::contract::calculate_pricing;

use crate::app::App;
use crate::cli::PricingArgs;

pub fn run(
    app: &App,
    args: &PricingArgs,
    out: &mut dyn Write,
) -> Result<()> {
    let fee = args.fee.unwrap_or_else(|| app.default_fee());
    let p = calculate_pricing(args.rent1, args.rent2, fee);

    writeln!(out, "Platform fee: {}%", p.fee_percentage.normalize())?;
    for (label, rent, platform_fee, total) in [
        ("Property 1", p.property1_rent, p.property1_platform_fee, p.property1_total),
        ("Property 2", p.property2_rent, p.property2_platform_fee, p.property2_total),
    ] {
        writeln!(out, "{label}")?;
        writeln!(out, "  Monthly rent:  {}", format_euros(rent))?;
        writeln!(out, "  Platform fee:  {}", format_euros(platform_fee))?;
        writeln!(out, "  Total monthly: {}", format_euros(total))?;
    }
    Ok(())
}
