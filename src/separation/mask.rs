//! Frequency-band gain masks
//!
//! Each stem gets a per-bin gain in [0, 1] chosen by the band the bin's
//! frequency falls into. The band cutoffs and weights are heuristic
//! defaults, not validated signal-processing parameters: they isolate
//! approximate frequency ranges per instrument class and make no
//! perceptual-quality guarantee. The four masks deliberately do not sum
//! to 1; this is an approximate separation, not a lossless decomposition.
//!
//! Masks are pure functions of (bin index, sample rate). Nothing is
//! cached across calls.

use crate::dsp::transform::SpectralFrame;
use crate::types::Stem;

/// One frequency band with a gain per stem
struct Band {
    /// Exclusive upper edge in Hz; the last band is open-ended
    upper_hz: f32,
    /// Gains in `Stem::ALL` order: drums, bass, vocals, other
    weights: [f32; 4],
}

/// Default banding: bass dominates the low end, vocals the mid range,
/// drums contribute transient energy at both extremes.
const BANDS: [Band; 6] = [
    Band { upper_hz: 100.0, weights: [0.2, 0.9, 0.1, 0.1] },
    Band { upper_hz: 250.0, weights: [0.3, 0.8, 0.1, 0.2] },
    Band { upper_hz: 500.0, weights: [0.5, 0.5, 0.2, 0.3] },
    Band { upper_hz: 2000.0, weights: [0.2, 0.1, 0.8, 0.5] },
    Band { upper_hz: 8000.0, weights: [0.3, 0.1, 0.7, 0.5] },
    Band { upper_hz: f32::INFINITY, weights: [0.6, 0.1, 0.2, 0.5] },
];

/// Gain applied to `stem` at the given frequency
pub fn mask_weight(stem: Stem, frequency_hz: f32) -> f32 {
    let idx = match stem {
        Stem::Drums => 0,
        Stem::Bass => 1,
        Stem::Vocals => 2,
        Stem::Other => 3,
    };

    for band in &BANDS {
        if frequency_hz < band.upper_hz {
            return band.weights[idx];
        }
    }
    // Unreachable: the last band is open-ended
    BANDS[BANDS.len() - 1].weights[idx]
}

/// Four masked copies of one spectral frame
#[derive(Debug, Clone)]
pub struct StemSpectra {
    pub drums: SpectralFrame,
    pub bass: SpectralFrame,
    pub vocals: SpectralFrame,
    pub other: SpectralFrame,
}

impl StemSpectra {
    pub fn get(&self, stem: Stem) -> &SpectralFrame {
        match stem {
            Stem::Drums => &self.drums,
            Stem::Bass => &self.bass,
            Stem::Vocals => &self.vocals,
            Stem::Other => &self.other,
        }
    }
}

/// Apply the four stem masks to a spectral frame
///
/// Each output bin is the input bin's (re, im) scaled by that stem's
/// gain at the bin frequency. Bins above Nyquist use the frequency of
/// their mirrored bin, which keeps masked spectra conjugate-symmetric
/// and the inverse transform real-valued. Always succeeds and always
/// returns four spectra with the input's bin count.
pub fn separate(spectrum: &SpectralFrame, sample_rate: u32) -> StemSpectra {
    let n = spectrum.len();

    let masked = |stem: Stem| -> SpectralFrame {
        let bins = spectrum
            .bins
            .iter()
            .enumerate()
            .map(|(k, &bin)| {
                let mirrored = if k <= n / 2 { k } else { n - k };
                let frequency = mirrored as f32 * sample_rate as f32 / n as f32;
                bin * mask_weight(stem, frequency)
            })
            .collect();
        SpectralFrame { bins }
    };

    StemSpectra {
        drums: masked(Stem::Drums),
        bass: masked(Stem::Bass),
        vocals: masked(Stem::Vocals),
        other: masked(Stem::Other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustfft::num_complex::Complex;

    #[test]
    fn test_band_weights_shape() {
        // Bass dominates below 250 Hz, vocals dominate the mid range
        assert!(mask_weight(Stem::Bass, 60.0) > mask_weight(Stem::Vocals, 60.0));
        assert!(mask_weight(Stem::Bass, 60.0) > mask_weight(Stem::Drums, 60.0));
        assert!(mask_weight(Stem::Vocals, 1000.0) > mask_weight(Stem::Bass, 1000.0));
        assert!(mask_weight(Stem::Vocals, 3000.0) > mask_weight(Stem::Bass, 3000.0));
        // Above 8 kHz the bass mask is nearly closed
        assert!(mask_weight(Stem::Bass, 12000.0) <= 0.1);
    }

    #[test]
    fn test_weights_in_unit_interval() {
        for stem in Stem::ALL {
            for f in [0.0, 99.9, 100.0, 249.0, 500.0, 1999.0, 8000.0, 20000.0] {
                let w = mask_weight(stem, f);
                assert!((0.0..=1.0).contains(&w), "{} at {} Hz: {}", stem, f, w);
            }
        }
    }

    #[test]
    fn test_always_four_spectra_of_input_length() {
        for n in [64usize, 1024, 4096] {
            let spectrum = SpectralFrame {
                bins: vec![Complex::new(1.0, -0.5); n],
            };
            let stems = separate(&spectrum, 44100);
            for stem in Stem::ALL {
                assert_eq!(stems.get(stem).len(), n);
            }
        }
    }

    #[test]
    fn test_silence_separates_to_silence() {
        let spectrum = SpectralFrame {
            bins: vec![Complex::new(0.0, 0.0); 2048],
        };
        let stems = separate(&spectrum, 44100);
        for stem in Stem::ALL {
            assert!(stems.get(stem).bins.iter().all(|c| c.norm() == 0.0));
        }
    }

    #[test]
    fn test_masking_preserves_conjugate_symmetry() {
        let n = 256;
        // Conjugate-symmetric input, as produced by a real signal
        let mut bins = vec![Complex::new(0.0, 0.0); n];
        for k in 1..n / 2 {
            let c = Complex::new(k as f32 * 0.1, -(k as f32) * 0.05);
            bins[k] = c;
            bins[n - k] = c.conj();
        }
        bins[0] = Complex::new(3.0, 0.0);

        let stems = separate(&SpectralFrame { bins }, 44100);
        for stem in Stem::ALL {
            let out = &stems.get(stem).bins;
            for k in 1..n / 2 {
                let diff = (out[k] - out[n - k].conj()).norm();
                assert!(diff < 1e-6, "{} bin {} broke symmetry", stem, k);
            }
        }
    }

    #[test]
    fn test_mask_scales_both_components() {
        let spectrum = SpectralFrame {
            bins: vec![Complex::new(2.0, -4.0); 1024],
        };
        let stems = separate(&spectrum, 44100);
        // Bin 2 at 44.1kHz/1024 is ~86 Hz, in the lowest band
        let w = mask_weight(Stem::Bass, 86.13);
        let bin = stems.bass.bins[2];
        assert!((bin.re - 2.0 * w).abs() < 1e-6);
        assert!((bin.im + 4.0 * w).abs() < 1e-6);
    }
}
