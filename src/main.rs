use shift_roster::config::load_setup;
use shift_roster::display::{print_coverage, print_roster, print_substitutions, write_roster_json};
use shift_roster::logging::init_tracing;
use shift_roster::parser::load_availability;
use shift_roster::schedule::{check_date, optimize};

fn usage() -> ! {
    eprintln!("usage: shift-roster <setup.json> <availability.csv> [roster.json]");
    std::process::exit(2);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    let (Some(setup_path), Some(csv_path)) = (args.get(1), args.get(2)) else {
        usage();
    };
    let out_path = args.get(3);

    println!("Loading setup from {}...", setup_path);
    let setup = load_setup(setup_path)?;
    println!("Loaded {} staff members", setup.staff.len());
    print_substitutions(&setup.config.slots);

    println!("Loading availability from {}...", csv_path);
    let availability = load_availability(csv_path)?;

    let roster = optimize(&availability, &setup.staff, &setup.config)?;
    print_roster(&roster);

    // Every submitted date, so dates where nothing could be placed still show their shortfall
    for date in availability.dates() {
        let report = check_date(date, &roster, &setup.staff, &setup.config);
        print_coverage(date, &report);
    }

    if let Some(out_path) = out_path {
        write_roster_json(&roster, out_path)?;
        println!("\nRoster saved to {}", out_path);
    }

    Ok(())
}
