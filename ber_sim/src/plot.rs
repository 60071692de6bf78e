//! Constellation and symbol export with gnuplot scripts
//!
//! Data files are plain text, one point per line, `index i q` (or
//! `i q` without indices) behind a `#` header comment. Each data file
//! gets a companion `.plt` script that renders it.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use phy_qam::{IqBuffer, Mapper};

/// Save a mapper's constellation as `index i q` rows.
pub fn save_constellation<P: AsRef<Path>>(
    mapper: &Mapper,
    path: P,
    include_indices: bool,
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "# {} constellation", mapper.order())?;
    writeln!(
        file,
        "# Format: {}",
        if include_indices { "index i q" } else { "i q" }
    )?;
    for (index, point) in mapper.constellation().iter().enumerate() {
        if include_indices {
            writeln!(file, "{index} {} {}", point.i, point.q)?;
        } else {
            writeln!(file, "{} {}", point.i, point.q)?;
        }
    }
    file.flush()
}

/// Save modulated symbols as `index i q` rows.
pub fn save_symbols<P: AsRef<Path>>(
    symbols: &IqBuffer,
    path: P,
    include_indices: bool,
) -> io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);
    writeln!(file, "# Modulated symbols")?;
    writeln!(
        file,
        "# Format: {}",
        if include_indices { "index i q" } else { "i q" }
    )?;
    for (index, sample) in symbols.samples().enumerate() {
        if include_indices {
            writeln!(file, "{index} {} {}", sample.i, sample.q)?;
        } else {
            writeln!(file, "{} {}", sample.i, sample.q)?;
        }
    }
    file.flush()
}

/// Generate a gnuplot script that renders a saved data file.
pub fn write_gnuplot_script<P: AsRef<Path>>(
    data_path: &Path,
    script_path: P,
    title: &str,
    include_indices: bool,
) -> io::Result<()> {
    let data = data_path.display();
    let mut file = BufWriter::new(File::create(script_path)?);

    writeln!(file, "#!/usr/bin/gnuplot -persist")?;
    writeln!(file)?;
    writeln!(file, "set title '{title}'")?;
    writeln!(file, "set xlabel 'In-phase (I)'")?;
    writeln!(file, "set ylabel 'Quadrature (Q)'")?;
    writeln!(file, "set grid")?;
    writeln!(file, "set size square")?;
    writeln!(file, "set xrange [-8:8]")?;
    writeln!(file, "set yrange [-8:8]")?;
    writeln!(file)?;
    writeln!(file, "set style line 1 lc rgb '#0060ad' pt 7 ps 1.5")?;
    writeln!(file)?;
    if include_indices {
        writeln!(
            file,
            "plot '{data}' using 2:3 with points ls 1 title '{title}', \\"
        )?;
        writeln!(
            file,
            "     '{data}' using 2:3:1 with labels offset 0.5,0.5 title ''"
        )?;
    } else {
        writeln!(file, "plot '{data}' using 1:2 with points ls 1 title '{title}'")?;
    }
    writeln!(file, "pause -1 'Press ENTER to close'")?;
    file.flush()
}

/// Save a constellation and its plot script as `<base>.dat` /
/// `<base>.plt`.
pub fn save_and_plot_constellation(
    mapper: &Mapper,
    base: &Path,
    include_indices: bool,
) -> io::Result<(PathBuf, PathBuf)> {
    let data_path = base.with_extension("dat");
    let script_path = base.with_extension("plt");

    save_constellation(mapper, &data_path, include_indices)?;
    write_gnuplot_script(
        &data_path,
        &script_path,
        &format!("{} constellation", mapper.order()),
        include_indices,
    )?;
    Ok((data_path, script_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use phy_qam::ModulationOrder;

    fn temp_base(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("ber_sim_plot_{}_{name}", std::process::id()))
    }

    #[test]
    fn test_constellation_export() {
        let mapper = Mapper::new(ModulationOrder::Qpsk);
        let base = temp_base("qpsk");
        let (data_path, script_path) = save_and_plot_constellation(&mapper, &base, true).unwrap();

        let data = fs::read_to_string(&data_path).unwrap();
        let lines: Vec<&str> = data.lines().collect();
        // Two header comments plus four points.
        assert_eq!(lines.len(), 6);
        assert!(lines[0].starts_with('#'));
        assert_eq!(lines[2], "0 -1 -1");
        assert_eq!(lines[5], "3 1 1");

        let script = fs::read_to_string(&script_path).unwrap();
        assert!(script.contains("QPSK constellation"));
        assert!(script.contains("with labels"));

        fs::remove_file(data_path).unwrap();
        fs::remove_file(script_path).unwrap();
    }

    #[test]
    fn test_symbol_export_without_indices() {
        let mapper = std::sync::Arc::new(Mapper::new(ModulationOrder::Qpsk));
        let symbols = phy_qam::Modulator::with_mapper(mapper).modulate(&[0b1000_0000]).unwrap();

        let path = temp_base("symbols.dat");
        save_symbols(&symbols, &path, false).unwrap();

        let data = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = data.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[2], "1 -1");
        assert_eq!(lines[3], "-1 -1");

        fs::remove_file(path).unwrap();
    }
}
