//! Block jobs: the unit of work handed to render workers.
//!
//! The image is cut into rectangular blocks up front. Every block carries its
//! own random source seeded from its position in the job list, so the pixels
//! it produces do not depend on which thread renders it or when.

use crate::renderer::{ray_color, ImageBuffer, RenderConfig};
use crate::{Camera, Color, RandomSource, RenderError, Scene};

/// How the image is divided into jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobLayout {
    /// Full-width strips of this many rows.
    Rows(u32),
    /// Square tiles with this edge length, in row-major order.
    Tiles(u32),
}

impl Default for JobLayout {
    fn default() -> Self {
        JobLayout::Rows(1)
    }
}

impl JobLayout {
    pub(crate) fn validate(&self) -> Result<(), RenderError> {
        match *self {
            JobLayout::Rows(0) | JobLayout::Tiles(0) => Err(RenderError::EmptyJob),
            _ => Ok(()),
        }
    }
}

/// A rectangular region of the image together with everything needed to render it.
#[derive(Debug, Clone)]
pub struct BlockJob {
    /// First scanline (0 is the bottom of the image)
    pub row_start: u32,
    /// First column
    pub col_start: u32,
    pub num_rows: u32,
    pub num_cols: u32,
    pub samples_per_pixel: u32,
    pub max_depth: u32,
    /// Private random source, seeded from the job's position
    pub rng: RandomSource,
    /// Accumulated sample sums in row-major order within the block
    pub colors: Vec<Color>,
}

impl BlockJob {
    fn new(
        (row_start, col_start): (u32, u32),
        (num_rows, num_cols): (u32, u32),
        seed: u64,
        config: &RenderConfig,
    ) -> Self {
        Self {
            row_start,
            col_start,
            num_rows,
            num_cols,
            samples_per_pixel: config.samples_per_pixel,
            max_depth: config.max_depth,
            rng: RandomSource::new(seed),
            colors: vec![Color::ZERO; num_rows as usize * num_cols as usize],
        }
    }

    /// Trace every sample of every pixel in the block.
    pub fn run(&mut self, camera: &Camera, scene: &Scene, image_width: u32, image_height: u32) {
        // A single-pixel-wide image would otherwise divide by zero.
        let u_scale = 1.0 / image_width.saturating_sub(1).max(1) as f32;
        let v_scale = 1.0 / image_height.saturating_sub(1).max(1) as f32;

        for local_j in 0..self.num_rows {
            let j = self.row_start + local_j;
            for local_i in 0..self.num_cols {
                let i = self.col_start + local_i;
                let mut pixel_color = Color::ZERO;
                for _ in 0..self.samples_per_pixel {
                    let u = (i as f32 + self.rng.real()) * u_scale;
                    let v = (j as f32 + self.rng.real()) * v_scale;
                    let ray = camera.get_ray(u, v, &mut self.rng);
                    pixel_color += ray_color(&ray, scene, self.max_depth, &mut self.rng);
                }
                self.colors[(local_j * self.num_cols + local_i) as usize] = pixel_color;
            }
        }
    }

    /// Copy the block's sums into `image` at the block's own address.
    pub fn merge_into(&self, image: &mut ImageBuffer) {
        for local_j in 0..self.num_rows {
            for local_i in 0..self.num_cols {
                let color = self.colors[(local_j * self.num_cols + local_i) as usize];
                image.set(self.col_start + local_i, self.row_start + local_j, color);
            }
        }
    }
}

/// Precompute every job of a render in ascending order.
///
/// Job `n` is seeded with `n + 1`; with the default one-row layout that is the
/// scanline index plus one. Fails with [`RenderError::EmptyJob`] when the
/// layout asks for zero-sized blocks.
pub fn generate_jobs(config: &RenderConfig) -> Result<Vec<BlockJob>, RenderError> {
    config.layout.validate()?;

    let (block_rows, block_cols) = match config.layout {
        JobLayout::Rows(rows) => (rows, config.width),
        JobLayout::Tiles(size) => (size, size),
    };
    let (width, height) = (config.width, config.height);

    let mut jobs = Vec::new();
    let mut row = 0;
    while row < height {
        let num_rows = block_rows.min(height - row);
        let mut col = 0;
        while col < width {
            let num_cols = block_cols.min(width - col);
            let seed = jobs.len() as u64 + 1;
            jobs.push(BlockJob::new((row, col), (num_rows, num_cols), seed, config));
            col += block_cols;
        }
        row += block_rows;
    }

    Ok(jobs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(width: u32, height: u32, layout: JobLayout) -> RenderConfig {
        RenderConfig {
            width,
            height,
            samples_per_pixel: 2,
            max_depth: 3,
            thread_count: 1,
            layout,
        }
    }

    fn total_pixels(jobs: &[BlockJob]) -> usize {
        jobs.iter().map(|j| (j.num_rows * j.num_cols) as usize).sum()
    }

    #[test]
    fn test_one_job_per_row() {
        let jobs = generate_jobs(&config(10, 4, JobLayout::Rows(1))).expect("valid layout");
        assert_eq!(jobs.len(), 4);

        for (row, job) in jobs.iter().enumerate() {
            assert_eq!(job.row_start, row as u32);
            assert_eq!((job.col_start, job.num_rows, job.num_cols), (0, 1, 10));
            assert_eq!(job.colors.len(), 10);
            assert_eq!(job.samples_per_pixel, 2);
            assert_eq!(job.max_depth, 3);
        }
    }

    #[test]
    fn test_row_seed_is_row_plus_one() {
        let mut jobs = generate_jobs(&config(10, 4, JobLayout::Rows(1))).expect("valid layout");
        let mut expected = RandomSource::new(3 + 1);
        assert_eq!(jobs[3].rng.real().to_bits(), expected.real().to_bits());
    }

    #[test]
    fn test_row_blocks_partial_fit() {
        let jobs = generate_jobs(&config(7, 10, JobLayout::Rows(4))).expect("valid layout");
        assert_eq!(jobs.len(), 3);
        assert_eq!(jobs[2].row_start, 8);
        assert_eq!(jobs[2].num_rows, 2);
        assert_eq!(total_pixels(&jobs), 70);
    }

    #[test]
    fn test_tiles_cover_image() {
        let jobs = generate_jobs(&config(100, 100, JobLayout::Tiles(64))).expect("valid layout");
        assert_eq!(jobs.len(), 4); // 2x2 grid with partial tiles
        assert_eq!(total_pixels(&jobs), 100 * 100);

        // Row-major order
        assert_eq!((jobs[1].row_start, jobs[1].col_start), (0, 64));
        assert_eq!((jobs[2].row_start, jobs[2].col_start), (64, 0));
        assert_eq!((jobs[3].num_rows, jobs[3].num_cols), (36, 36));
    }

    #[test]
    fn test_merge_into_uses_block_address() {
        let mut image = ImageBuffer::new(4, 3, 1);
        let mut job = BlockJob::new((1, 2), (2, 2), 1, &config(4, 3, JobLayout::Tiles(2)));
        for (n, c) in job.colors.iter_mut().enumerate() {
            *c = Color::splat(n as f32 + 1.0);
        }

        job.merge_into(&mut image);
        assert_eq!(image.get(2, 1), Color::splat(1.0));
        assert_eq!(image.get(3, 1), Color::splat(2.0));
        assert_eq!(image.get(2, 2), Color::splat(3.0));
        assert_eq!(image.get(3, 2), Color::splat(4.0));
        assert_eq!(image.get(0, 0), Color::ZERO);
    }

    #[test]
    fn test_layout_validation() {
        assert!(JobLayout::Rows(1).validate().is_ok());
        assert!(matches!(JobLayout::Tiles(0).validate(), Err(RenderError::EmptyJob)));
    }

    #[test]
    fn test_zero_sized_blocks_are_rejected() {
        for layout in [JobLayout::Rows(0), JobLayout::Tiles(0)] {
            let result = generate_jobs(&config(16, 16, layout));
            assert!(matches!(result, Err(RenderError::EmptyJob)), "{layout:?}");
        }
    }
}
