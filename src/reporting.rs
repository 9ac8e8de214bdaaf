use crate::runner::StationSummary;

const JOULES_PER_KWH: f64 = 3_600_000.0;

pub fn print_station_report(stations: &[StationSummary]) {
    println!("\n--- Station Report ---");
    for s in stations {
        println!(
            "{}: delivered {:.2} kWh, final SoC {:.2}/{:.2} kWh, {} session(s)",
            s.id,
            s.energy_delivered_j / JOULES_PER_KWH,
            s.final_soc_j / JOULES_PER_KWH,
            s.capacity_j / JOULES_PER_KWH,
            s.sessions
        );
    }
}
