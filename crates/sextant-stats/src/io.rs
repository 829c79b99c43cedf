use crate::Distribution;
use std::io::{Read, Write};

/// An error type for reading and writing distributions.
#[derive(thiserror::Error, Debug)]
pub enum DistributionError {
    /// Error while encoding a distribution.
    #[error("failed to encode distribution")]
    Encode(#[from] bincode::error::EncodeError),

    /// Error while decoding a distribution.
    #[error("failed to decode distribution")]
    Decode(#[from] bincode::error::DecodeError),
}

fn config() -> impl bincode::config::Config {
    bincode::config::standard()
        .with_fixed_int_encoding()
        .with_little_endian()
}

/// Write a distribution as `(n: u64, mean, covariance row-major)`, little endian.
///
/// Only the count is written for an empty distribution.
pub fn write_distribution<const D: usize, W: Write>(
    dist: &Distribution<D>,
    writer: &mut W,
) -> Result<usize, DistributionError> {
    Ok(bincode::encode_into_std_write(dist, writer, config())?)
}

/// Read a distribution written by [`write_distribution`].
pub fn read_distribution<const D: usize, R: Read>(
    reader: &mut R,
) -> Result<Distribution<D>, DistributionError> {
    Ok(bincode::decode_from_std_read(reader, config())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use std::io::{Seek, SeekFrom};

    #[test]
    fn test_write_read_file() -> Result<(), Box<dyn std::error::Error>> {
        let dists = [
            (0..10)
                .map(|i| Vector3::new(i as f64, (i % 3) as f64, 0.5 * i as f64))
                .collect::<Distribution<3>>(),
            Distribution::new(),
            [Vector3::new(1.0, 1.0, 1.0)].into_iter().collect(),
        ];

        let mut file = tempfile::tempfile()?;
        let mut written = 0;
        for dist in &dists {
            written += write_distribution(dist, &mut file)?;
        }
        assert_eq!(written, (8 + 24 + 72) + 8 + (8 + 24 + 72));

        file.seek(SeekFrom::Start(0))?;
        for dist in &dists {
            let read: Distribution<3> = read_distribution(&mut file)?;
            assert_eq!(read.n(), dist.n());
            assert_eq!(read.mean(), dist.mean());
            assert_relative_eq!(read.covariance(), dist.covariance(), epsilon = 1e-12);
        }
        Ok(())
    }

    #[test]
    fn test_truncated_input() {
        let mut bytes: &[u8] = &[5, 0, 0, 0, 0, 0, 0, 0, 1, 2];
        let result = read_distribution::<2, _>(&mut bytes);
        assert!(matches!(result, Err(DistributionError::Decode(_))));
    }

    #[test]
    fn test_write_failure() {
        let dist = [Vector3::new(1.0, 2.0, 3.0)].into_iter().collect::<Distribution<3>>();
        // room for the count only
        let mut buffer = [0u8; 8];
        let mut writer: &mut [u8] = &mut buffer;
        let result = write_distribution(&dist, &mut writer);
        assert!(matches!(result, Err(DistributionError::Encode(_))));
    }
}
