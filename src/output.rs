// src/output.rs
use crate::sim::Trajectory;
use ndarray::{Array1, Array2};
use std::fs::File;
use std::io::{self, BufWriter, Write};

fn write_rows<W: Write>(
    out: &mut W,
    prefix: &str,
    times: &Array1<f64>,
    rows: &Array2<f64>,
) -> io::Result<()> {
    let header: Vec<String> = (0..rows.ncols()).map(|j| format!("{}{}", prefix, j)).collect();
    writeln!(out, "t,{}", header.join(","))?;
    for (t, row) in times.iter().zip(rows.outer_iter()) {
        let values: Vec<String> = row.iter().map(|v| v.to_string()).collect();
        writeln!(out, "{},{}", t, values.join(","))?;
    }
    Ok(())
}

/// One line per grid point: `t,x0,x1,...`
pub fn write_trajectory_to_csv(filename: &str, trajectory: &Trajectory) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    write_rows(&mut file, "x", &trajectory.times, &trajectory.states)?;
    file.flush()
}

/// One line per grid point: `t,impulse0,impulse1,...`
pub fn write_impulses_to_csv(
    filename: &str,
    times: &Array1<f64>,
    impulses: &Array2<f64>,
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(filename)?);
    write_rows(&mut file, "impulse", times, impulses)?;
    file.flush()
}

pub fn write_summary_to_csv(filename: &str, summary_data: &[(&str, &str)]) -> io::Result<()> {
    let mut file = File::create(filename)?;
    for (key, value) in summary_data {
        writeln!(file, "{},{}", key, value)?;
    }
    Ok(())
}
