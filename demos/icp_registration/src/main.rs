use argh::FromArgs;
use glam::DVec3;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;

use sextant::icp::{icp, IcpParams};
use sextant::k3d::{self, Point, PointCloud};
use sextant::lie::se3::SE3;
use sextant::stats::{io::write_distribution, Distribution, EigenValueLimit};

#[derive(FromArgs)]
/// Register a synthetic scan against a displaced copy of itself
struct Args {
    /// number of lattice points along x and y
    #[argh(option, default = "8")]
    size: usize,

    /// amplitude of the noise added to the destination cloud
    #[argh(option, default = "0.01")]
    noise: f64,

    /// yaw of the displacement, in radians
    #[argh(option, default = "0.05")]
    yaw: f64,

    /// translation of the displacement along x
    #[argh(option, default = "0.1")]
    tx: f64,

    /// translation of the displacement along y
    #[argh(option, default = "-0.05")]
    ty: f64,

    /// maximum distance between associated points
    #[argh(option, default = "0.5")]
    max_distance: f64,

    /// fraction of destination points replaced by dropouts
    #[argh(option, default = "0.0")]
    dropout: f64,

    /// seed of the random generator
    #[argh(option, default = "42")]
    seed: u64,

    /// write the distribution of the final residuals to this file
    #[argh(option)]
    residuals_path: Option<PathBuf>,
}

fn make_scan(size: usize, rng: &mut impl Rng) -> PointCloud<DVec3> {
    let half = size as f64 / 2.0;
    let mut points = Vec::with_capacity(size * size * 3);
    for x in 0..size {
        for y in 0..size {
            for z in 0..3 {
                let jitter = DVec3::new(
                    rng.random_range(-0.05..0.05),
                    rng.random_range(-0.05..0.05),
                    0.0,
                );
                points.push(DVec3::new(x as f64 - half, y as f64 - half, z as f64) + jitter);
            }
        }
    }
    PointCloud::new(points)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let mut rng = rand::rngs::StdRng::seed_from_u64(args.seed);

    let source_cloud = make_scan(args.size, &mut rng);
    println!("Source cloud: #{} points", source_cloud.len());

    let dst_from_src = SE3::from_xyz_rpy([args.tx, args.ty, 0.0], [0.0, 0.0, args.yaw]);
    let noise = args.noise.abs();
    let target_cloud = source_cloud
        .iter()
        .map(|p| {
            if rng.random::<f64>() < args.dropout {
                return DVec3::splat(f64::NAN);
            }
            let n = if noise > 0.0 {
                DVec3::new(
                    rng.random_range(-noise..noise),
                    rng.random_range(-noise..noise),
                    rng.random_range(-noise..noise),
                )
            } else {
                DVec3::ZERO
            };
            dst_from_src * *p + n
        })
        .collect::<PointCloud<_>>();
    println!("Target cloud: #{} points", target_cloud.len());

    println!(
        "Before: hausdorff {:.4}, average {:.4}, inliers {:.2}",
        k3d::hausdorff(&source_cloud, &target_cloud),
        k3d::hausdorff_avg(&source_cloud, &target_cloud),
        k3d::hausdorff_fraction(&source_cloud, &target_cloud, 0.05),
    );

    let params = IcpParams::<SE3>::default().with_max_correspondence_distance(args.max_distance);
    let result = icp(&source_cloud, &target_cloud, &params);
    println!(
        "ICP registration: {:?} after {} iterations",
        result.termination, result.iterations
    );
    println!("Estimated: {:?}", result.transform.to_array());
    println!("Expected:  {:?}", dst_from_src.to_array());

    let aligned = source_cloud
        .iter()
        .map(|p| result.transform * *p)
        .collect::<PointCloud<_>>();

    println!(
        "After: hausdorff {:.4}, average {:.4}, inliers {:.2}, score {:.4}",
        k3d::hausdorff(&aligned, &target_cloud),
        k3d::hausdorff_avg(&aligned, &target_cloud),
        k3d::hausdorff_fraction(&aligned, &target_cloud, 0.05),
        k3d::hausdorff_mpe(&aligned, &target_cloud),
    );

    let covariance = k3d::hausdorff_covariance_limited(
        &aligned,
        &target_cloud,
        &EigenValueLimit::from_exponent(3),
    );
    println!("Residual covariance: {covariance}");

    if let Some(path) = args.residuals_path {
        let residuals = aligned
            .iter()
            .filter_map(|p| {
                let nn = k3d::nearest_neighbour_index(p, &target_cloud)?;
                let q = target_cloud.get(nn)?;
                Some(p.to_vector() - q.to_vector())
            })
            .collect::<Distribution<3>>();

        let mut file = std::fs::File::create(&path)?;
        write_distribution(&residuals, &mut file)?;
        log::info!("wrote {} residuals to {}", residuals.n(), path.display());
    }

    Ok(())
}

