use std::{env, fs, io};

use hogwild_bpr::{Bpr, JobSpec};
use log::info;

fn main() -> io::Result<()> {
    env_logger::init();

    let path = env::args()
        .nth(1)
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "usage: bpr-train <job.json>"))?;

    let raw = fs::read_to_string(&path)?;
    let JobSpec { training, dataset } = serde_json::from_str(&raw).map_err(io::Error::other)?;
    info!("loaded job from {path}");

    let matrix = dataset.load()?;
    let mut model = Bpr::new(training);
    let reports = model.fit_with(&matrix, |report| {
        info!(
            "epoch {}: {}/{} correct ({:.2}%) in {:?}",
            report.epoch,
            report.correct,
            report.samples,
            report.accuracy() * 100.,
            report.elapsed
        );
    })?;

    if let Some(last) = reports.last() {
        info!("final accuracy {:.4}", last.accuracy());
    }

    Ok(())
}
