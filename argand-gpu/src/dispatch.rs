//! Dispatch geometry selection for compute kernels.

/// Device capabilities that constrain the geometry search.
#[derive(Debug, Clone, Copy)]
pub struct DeviceLimits {
    /// Upper bound on `group_width * group_height`.
    pub max_threads_per_group: u32,
    /// Preferred execution-wave width; groups whose thread count is not a
    /// multiple of this leave lanes idle.
    pub wave_width: u32,
}

/// Wave width assumed when the backend does not report one. wgpu exposes no
/// subgroup-size limit, and 32 matches the common desktop GPUs.
pub const DEFAULT_WAVE_WIDTH: u32 = 32;

impl DeviceLimits {
    /// # Panics
    /// Panics if either limit is zero.
    pub fn new(max_threads_per_group: u32, wave_width: u32) -> Self {
        assert!(
            max_threads_per_group > 0 && wave_width > 0,
            "device limits must be non-zero"
        );
        Self {
            max_threads_per_group,
            wave_width,
        }
    }

    pub fn from_wgpu(limits: &wgpu::Limits) -> Self {
        Self::new(
            limits.max_compute_invocations_per_workgroup,
            DEFAULT_WAVE_WIDTH,
        )
    }
}

/// Sizes for one compute dispatch: threads per group and groups per grid,
/// together covering at least the whole surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchGeometry {
    pub threads_per_group: (u32, u32),
    pub groups_per_grid: (u32, u32),
}

impl DispatchGeometry {
    /// Designated "skip dispatch" value produced for zero-dimension surfaces.
    pub const EMPTY: Self = Self {
        threads_per_group: (0, 0),
        groups_per_grid: (0, 0),
    };

    pub fn is_empty(&self) -> bool {
        let (tw, th) = self.threads_per_group;
        let (gw, gh) = self.groups_per_grid;
        tw == 0 || th == 0 || gw == 0 || gh == 0
    }
}

/// Selects dispatch geometry for a surface by exhaustive search.
///
/// Enumerates every (group_width, group_height) pair whose product stays
/// within `limits.max_threads_per_group`, rounds the grid up to cover the
/// surface, and scores each candidate by estimated waste: the excess area
/// covered beyond the surface plus the lanes idled in every group whose
/// thread count is not a multiple of the wave width. Ties resolve to the
/// first minimum in enumeration order: ascending width, then ascending
/// height.
///
/// A zero-dimension surface yields [`DispatchGeometry::EMPTY`], signalling
/// the caller to skip the dispatch altogether.
pub fn select_dispatch_geometry(limits: DeviceLimits, width: u32, height: u32) -> DispatchGeometry {
    if width == 0 || height == 0 {
        log::debug!("surface has a zero dimension, skipping dispatch");
        return DispatchGeometry::EMPTY;
    }

    let max = limits.max_threads_per_group;
    let mut best: Option<(u64, DispatchGeometry)> = None;

    for group_width in 1..=max {
        for group_height in 1..=(max / group_width) {
            let candidate = DispatchGeometry {
                threads_per_group: (group_width, group_height),
                groups_per_grid: (width.div_ceil(group_width), height.div_ceil(group_height)),
            };
            let cost = estimated_waste(&candidate, width, height, limits.wave_width);
            if best.map_or(true, |(lowest, _)| cost < lowest) {
                best = Some((cost, candidate));
            }
        }
    }

    match best {
        Some((_, geometry)) => geometry,
        None => DispatchGeometry::EMPTY,
    }
}

fn estimated_waste(geometry: &DispatchGeometry, width: u32, height: u32, wave_width: u32) -> u64 {
    let (tw, th) = geometry.threads_per_group;
    let (gw, gh) = geometry.groups_per_grid;

    let excess_width = (tw * gw - width) as u64;
    let excess_height = (th * gh - height) as u64;
    let excess_area =
        excess_width * height as u64 + excess_height * width as u64 + excess_width * excess_height;

    let threads_per_group = tw * th;
    let idle_per_group = ((wave_width - threads_per_group % wave_width) % wave_width) as u64;
    let total_groups = gw as u64 * gh as u64;

    excess_area + idle_per_group * total_groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_hd_surface_respects_the_thread_limit_and_covers_the_surface() {
        let limits = DeviceLimits::new(256, 32);
        let geometry = select_dispatch_geometry(limits, 1920, 1080);

        let (tw, th) = geometry.threads_per_group;
        let (gw, gh) = geometry.groups_per_grid;
        assert!(tw * th <= 256);
        assert!(tw * gw >= 1920);
        assert!(th * gh >= 1080);
    }

    #[test]
    fn zero_dimension_surface_yields_the_empty_geometry() {
        let limits = DeviceLimits::new(256, 32);
        assert_eq!(
            select_dispatch_geometry(limits, 0, 1080),
            DispatchGeometry::EMPTY
        );
        assert_eq!(
            select_dispatch_geometry(limits, 1920, 0),
            DispatchGeometry::EMPTY
        );
        assert!(DispatchGeometry::EMPTY.is_empty());
    }

    #[test]
    fn ties_resolve_to_the_first_candidate_in_enumeration_order() {
        // With a wave width of 1 every exact cover of an 8x8 surface costs
        // zero; the first one enumerated is a 1x1 group.
        let limits = DeviceLimits::new(256, 1);
        let geometry = select_dispatch_geometry(limits, 8, 8);
        assert_eq!(geometry.threads_per_group, (1, 1));
        assert_eq!(geometry.groups_per_grid, (8, 8));
    }

    #[test]
    fn wave_width_steers_the_search_to_full_waves() {
        // On an 8x8 surface with 32-wide waves, the first zero-waste
        // candidate is a 4x8 group: 32 threads, exact cover.
        let limits = DeviceLimits::new(256, 32);
        let geometry = select_dispatch_geometry(limits, 8, 8);
        assert_eq!(geometry.threads_per_group, (4, 8));
        assert_eq!(geometry.groups_per_grid, (2, 1));
    }

    #[test]
    fn selected_geometry_is_never_empty_for_a_real_surface() {
        let limits = DeviceLimits::new(64, 32);
        for (w, h) in [(1, 1), (3, 7), (640, 480), (13, 1081)] {
            let geometry = select_dispatch_geometry(limits, w, h);
            assert!(!geometry.is_empty(), "empty geometry for {w}x{h}");
        }
    }
}
