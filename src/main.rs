use ansi_term::Style;
use cycle_simulator as sim;
use gnuplot::{AxesCommon, Caption, Color, Figure};
use sim::json_reader::{JsonCase, JsonCycle, JsonTransient};
use std::io::Write;

fn main() {
    let case = match std::env::args().nth(1) {
        Some(file) => match sim::json_reader::read_case(&file) {
            Ok(case) => case,
            Err(err) => {
                println!("Error reading case file:\n {}", err);
                std::process::exit(1);
            }
        },
        None => default_case(),
    };

    if let Some(cycle) = &case.cycle {
        run_cycle(cycle);
    }
    if let Some(transient) = &case.transient {
        run_transient(transient);
    }
}

/// The built-in demonstration case: the textbook Otto inputs and the
/// reference RLC circuit.
fn default_case() -> JsonCase {
    JsonCase {
        cycle: Some(JsonCycle {
            cycle_type: "otto".to_string(),
            ini_temperature: 300.0, // [K]
            ini_pressure: 100.0,    // [kPa]
            compression_ratio: 8.0,
            cutoff_ratio: None,
            heat_addition: None,
        }),
        transient: Some(JsonTransient {
            resistance: 10.0,       // [ohm]
            inductance: 20.0,       // [H]
            capacitance: 0.05,      // [F]
            source_amplitude: 20.0, // [V]
            source_frequency: 20.0, // [rad/s]
            source_phase: 0.0,      // [rad]
        }),
    }
}

fn run_cycle(cycle: &JsonCycle) {
    let model = sim::CycleModel::new();
    let result = match cycle.cycle_type.as_str() {
        "otto" => model.run_otto_with_heat(
            cycle.ini_temperature,
            cycle.ini_pressure,
            cycle.compression_ratio,
            cycle.heat_addition.unwrap_or(sim::DEFAULT_HEAT_ADDITION),
        ),
        "diesel" => {
            let cutoff_ratio = match cycle.cutoff_ratio {
                Some(rc) => rc,
                None => {
                    println!("Error: diesel cycle requires 'cutoff_ratio'");
                    std::process::exit(1);
                }
            };
            model.run_diesel(
                cycle.ini_temperature,
                cycle.ini_pressure,
                cycle.compression_ratio,
                cutoff_ratio,
            )
        }
        other => {
            println!("Error: unknown cycle type '{}'", other);
            std::process::exit(1);
        }
    };
    let result = match result {
        Ok(result) => result,
        Err(err) => {
            println!("Error running {} cycle:\n {}", cycle.cycle_type, err);
            std::process::exit(1);
        }
    };

    println!("{}", Style::new().bold().paint(format!("{} cycle", cycle.cycle_type)));
    println!("{}\n", result);

    let states = result
        .states
        .iter()
        .map(|s| format!("{}\t{}\t{}\n", s.T(), s.P(), s.v()))
        .collect::<Vec<String>>();
    let mut file = std::fs::File::create("cycle_states").expect("Error opening writing file");
    write!(file, "T [K]\tP [kPa]\tv [m³/kg]\n{}", states.join("")).expect("Unable to write data");

    // Close the P-v loop back to state 1.
    let volume: Vec<f64> = result
        .states
        .iter()
        .chain(result.states.first())
        .map(|s| s.v())
        .collect();
    let pressure: Vec<f64> = result
        .states
        .iter()
        .chain(result.states.first())
        .map(|s| s.P())
        .collect();
    let mut fg = Figure::new();
    fg.axes2d()
        .set_title("P-v diagram", &[])
        .set_x_label("specific volume [m³/kg]", &[])
        .set_y_label("pressure [kPa]", &[])
        .lines_points(&volume, &pressure, &[Caption(&cycle.cycle_type), Color("blue")]);
    fg.echo_to_file("cycle_pv.gnuplot");
}

fn run_transient(transient: &JsonTransient) {
    let input = sim::TransientInput::new(
        transient.resistance,
        transient.inductance,
        transient.capacitance,
        transient.source_amplitude,
        transient.source_frequency,
        transient.source_phase,
    );
    let result = match sim::solve_transient(&input) {
        Ok(result) => result,
        Err(err) => {
            println!("Error running transient simulation:\n {}", err);
            std::process::exit(1);
        }
    };

    println!("{}", Style::new().bold().paint("RLC transient response"));
    println!(
        "peak inductor current: {:.4} [A]\npeak capacitor voltage: {:.4} [V]",
        result
            .inductor_current
            .iter()
            .fold(0.0f64, |acc, x| acc.max(x.abs())),
        result
            .capacitor_voltage
            .iter()
            .fold(0.0f64, |acc, x| acc.max(x.abs()))
    );

    let rows = result
        .time
        .iter()
        .enumerate()
        .map(|(i, t)| {
            format!(
                "{}\t{}\t{}\t{}\n",
                t,
                result.inductor_current[i],
                result.capacitor_current[i],
                result.capacitor_voltage[i]
            )
        })
        .collect::<Vec<String>>();
    let mut file = std::fs::File::create("transient_response").expect("Error opening writing file");
    write!(
        file,
        "time [s]\ti1 [A]\ti2 [A]\tvc [V]\n{}",
        rows.join("")
    )
    .expect("Unable to write data");

    let mut fg = Figure::new();
    fg.axes2d()
        .set_title("Transient response of RLC circuit", &[])
        .set_x_label("time [s]", &[])
        .set_y_label("amplitude", &[])
        .lines(
            result.time.iter(),
            result.inductor_current.iter(),
            &[Caption("i1(t) - inductor current"), Color("blue")],
        )
        .lines(
            result.time.iter(),
            result.capacitor_current.iter(),
            &[Caption("i2(t) - capacitor current"), Color("green")],
        )
        .lines(
            result.time.iter(),
            result.capacitor_voltage.iter(),
            &[Caption("vc(t) - capacitor voltage"), Color("red")],
        );
    fg.echo_to_file("transient_response.gnuplot");
}
