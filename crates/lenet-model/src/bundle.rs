// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Test-set bundles: weights, ground-truth labels and images.
//!
//! A bundle directory contains a single `model.safetensors` file with five
//! int8 tensors:
//!
//! | Tensor         | Shape            |
//! |----------------|------------------|
//! | `conv1.weight` | `[6, 1, 5, 5]`   |
//! | `conv2.weight` | `[16, 6, 5, 5]`  |
//! | `fc.weight`    | `[10, 400]`      |
//! | `test.labels`  | `[N]`            |
//! | `test.images`  | `[N, 32, 32]`    |
//!
//! The file is memory-mapped and the tensors copied out once. Before a run,
//! [`ModelBundle::materialize`] lays the bundle out as the external-memory
//! image the DMA engine reads from.

use crate::layout::{check_memory_map, label_bytes};
use crate::reference;
use crate::topology::{
    CONV1, CONV2, FC_DEPTH, FC_INPUTS, IMG_DIM, IMG_SIZE, LABEL_CAPACITY,
};
use crate::ModelError;
use memory_map::{MemoryMap, RegionKind};
use quant_core::{checksum_i8, Conv3dParams};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use safetensors::tensor::TensorView;
use safetensors::{Dtype, SafeTensors};
use std::path::Path;
use tracing::{debug, info};

/// Bundle filename inside a bundle directory.
pub const BUNDLE_FILE: &str = "model.safetensors";

const CONV1_NAME: &str = "conv1.weight";
const CONV2_NAME: &str = "conv2.weight";
const FC_NAME: &str = "fc.weight";
const LABELS_NAME: &str = "test.labels";
const IMAGES_NAME: &str = "test.images";

/// Every synthetic image whose index is `MISLABEL_STRIDE - 1` modulo the
/// stride carries a wrong label.
const MISLABEL_STRIDE: usize = 8;

fn conv_weight_shape(p: &Conv3dParams) -> Vec<usize> {
    vec![p.ofm.depth, p.ifm.depth, p.weight_dim, p.weight_dim]
}

/// Checksum of one bundle tensor.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct TensorChecksum {
    pub name: &'static str,
    pub len: usize,
    pub checksum: i32,
}

/// The network's weights and a labelled test set, as host data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBundle {
    /// `[6][1][5][5]`, unpadded.
    pub conv1: Vec<i8>,
    /// `[16][6][5][5]`.
    pub conv2: Vec<i8>,
    /// `[10][400]`.
    pub fc: Vec<i8>,
    /// One class index per image.
    pub labels: Vec<i8>,
    /// Images back to back, `IMG_SIZE` bytes each.
    pub images: Vec<i8>,
}

impl ModelBundle {
    /// Number of labelled images.
    pub fn num_images(&self) -> usize {
        self.labels.len()
    }

    /// Pixels of image `index`.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    pub fn image(&self, index: usize) -> &[i8] {
        &self.images[index * IMG_SIZE..(index + 1) * IMG_SIZE]
    }

    /// Checks tensor lengths, image count and label range.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.labels.len();
        let expect = |name: &str, actual: usize, shape: Vec<usize>| {
            let expected: usize = shape.iter().product();
            if actual == expected {
                Ok(())
            } else {
                Err(ModelError::WrongShape {
                    name: name.to_string(),
                    expected: shape,
                    actual: vec![actual],
                })
            }
        };
        expect(CONV1_NAME, self.conv1.len(), conv_weight_shape(&CONV1))?;
        expect(CONV2_NAME, self.conv2.len(), conv_weight_shape(&CONV2))?;
        expect(FC_NAME, self.fc.len(), vec![FC_DEPTH, FC_INPUTS])?;
        expect(IMAGES_NAME, self.images.len(), vec![n, IMG_DIM, IMG_DIM])?;

        if n > LABEL_CAPACITY {
            return Err(ModelError::TooManyImages {
                count: n,
                capacity: LABEL_CAPACITY,
            });
        }
        if let Some((index, &label)) = self
            .labels
            .iter()
            .enumerate()
            .find(|&(_, &l)| l < 0 || l as usize >= FC_DEPTH)
        {
            return Err(ModelError::InvalidLabel { index, label });
        }
        Ok(())
    }

    /// Loads `model.safetensors` from `dir` and validates it.
    ///
    /// # Example
    /// ```no_run
    /// use lenet_model::ModelBundle;
    /// use std::path::Path;
    ///
    /// let bundle = ModelBundle::load(Path::new("./bundles/mnist-int8")).unwrap();
    /// println!("{} test images", bundle.num_images());
    /// ```
    pub fn load(dir: &Path) -> Result<Self, ModelError> {
        let path = dir.join(BUNDLE_FILE);
        let file = std::fs::File::open(&path)?;

        // SAFETY: the mapping is read-only and dropped before returning; the
        // bundle file is not expected to change underneath us.
        let mmap = unsafe { memmap2::Mmap::map(&file) }?;
        let tensors = SafeTensors::deserialize(&mmap)
            .map_err(|e| ModelError::SafeTensors(format!("'{}': {e}", path.display())))?;

        let labels = read_i8(&tensors, LABELS_NAME, None)?;
        let n = labels.len();
        let bundle = Self {
            conv1: read_i8(&tensors, CONV1_NAME, Some(conv_weight_shape(&CONV1)))?,
            conv2: read_i8(&tensors, CONV2_NAME, Some(conv_weight_shape(&CONV2)))?,
            fc: read_i8(&tensors, FC_NAME, Some(vec![FC_DEPTH, FC_INPUTS]))?,
            images: read_i8(&tensors, IMAGES_NAME, Some(vec![n, IMG_DIM, IMG_DIM]))?,
            labels,
        };
        bundle.validate()?;
        info!(path = %path.display(), images = n, "Bundle loaded");
        Ok(bundle)
    }

    /// Writes the bundle as `model.safetensors` in `dir`.
    pub fn save(&self, dir: &Path) -> Result<(), ModelError> {
        self.validate()?;
        let n = self.num_images();
        let entries = [
            (CONV1_NAME, conv_weight_shape(&CONV1), &self.conv1),
            (CONV2_NAME, conv_weight_shape(&CONV2), &self.conv2),
            (FC_NAME, vec![FC_DEPTH, FC_INPUTS], &self.fc),
            (LABELS_NAME, vec![n], &self.labels),
            (IMAGES_NAME, vec![n, IMG_DIM, IMG_DIM], &self.images),
        ];
        let mut views = Vec::with_capacity(entries.len());
        for (name, shape, data) in entries {
            let bytes: &[u8] = bytemuck::cast_slice(&data[..]);
            let view = TensorView::new(Dtype::I8, shape, bytes)
                .map_err(|e| ModelError::SafeTensors(format!("tensor '{name}': {e}")))?;
            views.push((name, view));
        }
        let path = dir.join(BUNDLE_FILE);
        safetensors::serialize_to_file(views, &None, &path)
            .map_err(|e| ModelError::SafeTensors(format!("'{}': {e}", path.display())))?;
        debug!(path = %path.display(), images = n, "Bundle saved");
        Ok(())
    }

    /// Generates a deterministic bundle of `num_images` images.
    ///
    /// Weights are drawn from `-3..=3` and pixels from `-8..=8`. Labels come
    /// from the golden forward pass, except that every eighth image is
    /// labelled with the next class so runs exercise mispredictions.
    pub fn synthetic(num_images: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut draw = |len: usize, bound: i8| -> Vec<i8> {
            (0..len).map(|_| rng.gen_range(-bound..=bound)).collect()
        };
        let conv1 = draw(CONV1.weight_len(), 3);
        let conv2 = draw(CONV2.weight_len(), 3);
        let fc = draw(FC_INPUTS * FC_DEPTH, 3);
        let images = draw(num_images * IMG_SIZE, 8);

        let labels = images
            .chunks_exact(IMG_SIZE)
            .enumerate()
            .map(|(i, image)| {
                let label = reference::forward(&conv1, &conv2, &fc, image).label();
                let label = if i % MISLABEL_STRIDE == MISLABEL_STRIDE - 1 {
                    (label + 1) % FC_DEPTH
                } else {
                    label
                };
                label as i8
            })
            .collect();

        Self {
            conv1,
            conv2,
            fc,
            labels,
            images,
        }
    }

    /// Lays the bundle out as an external-memory image for `map`.
    ///
    /// Weight regions are zero padded to whole words; image `i` lands at
    /// `images.base + i * IMG_SIZE`.
    pub fn materialize(&self, map: &MemoryMap) -> Result<Vec<u8>, ModelError> {
        self.validate()?;
        check_memory_map(map)?;

        let size = map.external_size.as_bytes() as usize;
        let mut image = vec![0u8; size];
        let mut place = |kind: RegionKind, data: &[i8], reserved: usize| -> Result<(), ModelError> {
            let region = map.require(kind)?;
            let needed = data.len().max(reserved);
            if needed > region.len as usize {
                return Err(ModelError::RegionTooSmall {
                    artifact: kind.as_str(),
                    needed,
                    available: region.len as usize,
                });
            }
            let base = region.base.get() as usize;
            image[base..base + data.len()].copy_from_slice(bytemuck::cast_slice(data));
            Ok(())
        };

        place(RegionKind::Conv1Weights, &self.conv1, 0)?;
        place(RegionKind::Conv2Weights, &self.conv2, 0)?;
        place(RegionKind::FcWeights, &self.fc, 0)?;
        place(RegionKind::Labels, &self.labels, label_bytes(self.num_images()))?;
        place(RegionKind::Images, &self.images, 0)?;

        debug!(bytes = size, images = self.num_images(), "Bundle materialised");
        Ok(image)
    }

    /// Checksums of every tensor, in file order.
    pub fn checksums(&self) -> [TensorChecksum; 5] {
        let sum = |name, data: &[i8]| TensorChecksum {
            name,
            len: data.len(),
            checksum: checksum_i8(data),
        };
        [
            sum(CONV1_NAME, &self.conv1[..]),
            sum(CONV2_NAME, &self.conv2[..]),
            sum(FC_NAME, &self.fc[..]),
            sum(LABELS_NAME, &self.labels[..]),
            sum(IMAGES_NAME, &self.images[..]),
        ]
    }
}

/// Copies an int8 tensor out of the container, checking dtype and shape.
fn read_i8(
    tensors: &SafeTensors<'_>,
    name: &str,
    expected_shape: Option<Vec<usize>>,
) -> Result<Vec<i8>, ModelError> {
    let view = tensors.tensor(name).map_err(|_| ModelError::TensorNotFound {
        name: name.to_string(),
    })?;
    if view.dtype() != Dtype::I8 {
        return Err(ModelError::WrongDType {
            name: name.to_string(),
            dtype: format!("{:?}", view.dtype()),
        });
    }
    let shape = view.shape().to_vec();
    match expected_shape {
        Some(expected) if expected != shape => {
            return Err(ModelError::WrongShape {
                name: name.to_string(),
                expected,
                actual: shape,
            });
        }
        None if shape.len() != 1 => {
            return Err(ModelError::WrongShape {
                name: name.to_string(),
                expected: vec![shape.iter().product()],
                actual: shape,
            });
        }
        _ => {}
    }
    Ok(bytemuck::cast_slice::<u8, i8>(view.data()).to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::default_memory_map;

    #[test]
    fn test_synthetic_is_deterministic() {
        let a = ModelBundle::synthetic(4, 7);
        let b = ModelBundle::synthetic(4, 7);
        assert_eq!(a, b);
        assert_ne!(a, ModelBundle::synthetic(4, 8));
        a.validate().unwrap();
    }

    #[test]
    fn test_synthetic_labels_follow_reference() {
        let bundle = ModelBundle::synthetic(9, 1);
        for i in 0..9 {
            let predicted =
                reference::forward(&bundle.conv1, &bundle.conv2, &bundle.fc, bundle.image(i))
                    .label() as i8;
            if i == 7 {
                assert_ne!(bundle.labels[i], predicted);
            } else {
                assert_eq!(bundle.labels[i], predicted, "image {i}");
            }
        }
    }

    #[test]
    fn test_validate_rejects_bad_label() {
        let mut bundle = ModelBundle::synthetic(2, 1);
        bundle.labels[1] = 10;
        assert!(matches!(
            bundle.validate(),
            Err(ModelError::InvalidLabel { index: 1, label: 10 })
        ));
    }

    #[test]
    fn test_validate_rejects_short_weights() {
        let mut bundle = ModelBundle::synthetic(1, 1);
        bundle.fc.pop();
        assert!(matches!(bundle.validate(), Err(ModelError::WrongShape { .. })));
    }

    #[test]
    fn test_validate_rejects_too_many_images() {
        let mut bundle = ModelBundle::synthetic(1, 1);
        bundle.labels = vec![0; LABEL_CAPACITY + 1];
        bundle.images = vec![0; (LABEL_CAPACITY + 1) * IMG_SIZE];
        assert!(matches!(bundle.validate(), Err(ModelError::TooManyImages { .. })));
    }

    #[test]
    fn test_save_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let bundle = ModelBundle::synthetic(3, 42);
        bundle.save(dir.path()).unwrap();
        let loaded = ModelBundle::load(dir.path()).unwrap();
        assert_eq!(loaded, bundle);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(ModelBundle::load(dir.path()), Err(ModelError::Io(_))));
    }

    #[test]
    fn test_load_wrong_dtype() {
        let dir = tempfile::tempdir().unwrap();
        let data = [0u8; 8];
        let view = TensorView::new(Dtype::I32, vec![2], &data).unwrap();
        safetensors::serialize_to_file(
            vec![(LABELS_NAME, view)],
            &None,
            &dir.path().join(BUNDLE_FILE),
        )
        .unwrap();
        assert!(matches!(
            ModelBundle::load(dir.path()),
            Err(ModelError::WrongDType { .. })
        ));
    }

    #[test]
    fn test_materialize_places_artifacts() {
        let bundle = ModelBundle::synthetic(3, 5);
        let map = default_memory_map().unwrap();
        let ext = bundle.materialize(&map).unwrap();
        assert_eq!(ext.len() as u64, map.external_size.as_bytes());

        let conv1 = map.require(RegionKind::Conv1Weights).unwrap();
        let base = conv1.base.get() as usize;
        let bytes: &[u8] = bytemuck::cast_slice(&bundle.conv1[..]);
        assert_eq!(&ext[base..base + 150], bytes);
        // Word padding is zero.
        assert_eq!(&ext[base + 150..base + 152], &[0, 0]);

        let images = map.require(RegionKind::Images).unwrap();
        let slot = images.slot(2, IMG_SIZE as u32).unwrap().get() as usize;
        let img: &[u8] = bytemuck::cast_slice(bundle.image(2));
        assert_eq!(&ext[slot..slot + IMG_SIZE], img);

        let labels = map.require(RegionKind::Labels).unwrap().base.get() as usize;
        assert_eq!(ext[labels + 2] as i8, bundle.labels[2]);
        assert_eq!(ext[labels + 3], 0);
    }

    #[test]
    fn test_checksums() {
        let bundle = ModelBundle::synthetic(2, 3);
        let sums = bundle.checksums();
        assert_eq!(sums[0].name, "conv1.weight");
        assert_eq!(sums[0].len, 150);
        assert_eq!(sums[4].len, 2 * IMG_SIZE);
        assert_eq!(sums[2].checksum, checksum_i8(&bundle.fc));
    }
}
