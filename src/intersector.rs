use crate::error::UnknownStrategy;
use crate::scene::Scene;
use crate::shapes::{Surface, TriangleSearch};
use crate::{Interaction, Ray};
use std::convert::TryFrom;
use std::fmt;
use std::str::FromStr;

pub use crate::bvh::Descent;

/// How the nearest surface is found, fixed for a whole render.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Strategy {
    /// Every triangle of every surface.
    Naive = 0,

    /// Every surface whose box the ray passes through, then each of its triangles.
    Aabb = 1,

    /// Surfaces found by descending the scene tree, then each of their triangles.
    Bvh = 2,

    /// Surfaces found by descending the scene tree, then triangles found by descending each
    /// surface's own tree.
    TwoLevelBvh = 3,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Naive,
        Strategy::Aabb,
        Strategy::Bvh,
        Strategy::TwoLevelBvh,
    ];

    pub fn uses_scene_tree(self) -> bool {
        matches!(self, Strategy::Bvh | Strategy::TwoLevelBvh)
    }
}

impl TryFrom<i32> for Strategy {
    type Error = UnknownStrategy;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Strategy::Naive),
            1 => Ok(Strategy::Aabb),
            2 => Ok(Strategy::Bvh),
            3 => Ok(Strategy::TwoLevelBvh),
            _ => Err(UnknownStrategy(value.to_string())),
        }
    }
}

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "naive" => Ok(Strategy::Naive),
            "aabb" => Ok(Strategy::Aabb),
            "bvh" => Ok(Strategy::Bvh),
            "two-level-bvh" => Ok(Strategy::TwoLevelBvh),
            _ => s
                .parse::<i32>()
                .map_err(|_| UnknownStrategy(s.to_string()))
                .and_then(Strategy::try_from),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Naive => "naive",
            Strategy::Aabb => "aabb",
            Strategy::Bvh => "bvh",
            Strategy::TwoLevelBvh => "two-level bvh",
        };
        f.write_str(name)
    }
}

/// Finds the nearest hit of a ray against a scene.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Intersector {
    pub strategy: Strategy,
    pub descent: Descent,
}

impl Intersector {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            descent: Descent::default(),
        }
    }

    pub fn with_descent(strategy: Strategy, descent: Descent) -> Self {
        Self { strategy, descent }
    }

    fn triangle_search(&self) -> TriangleSearch {
        match self.strategy {
            Strategy::TwoLevelBvh => TriangleSearch::Tree(self.descent),
            _ => TriangleSearch::Linear,
        }
    }

    /// Nearest hit of `ray` in `scene`. Every accepted hit lowers `ray.t_max`, so on return it
    /// holds the hit distance (or is unchanged on a miss). A hit at exactly the current
    /// `t_max` replaces the previous one.
    pub fn intersect(&self, scene: &Scene, ray: &mut Ray) -> Option<Interaction> {
        let search = self.triangle_search();
        let mut closest = None;

        match self.strategy {
            Strategy::Naive => {
                for surface in &scene.surfaces {
                    test_surface(surface, ray, search, &mut closest);
                }
            }
            Strategy::Aabb => {
                for surface in &scene.surfaces {
                    if surface.bounds.intersect_p(ray) {
                        test_surface(surface, ray, search, &mut closest);
                    }
                }
            }
            Strategy::Bvh | Strategy::TwoLevelBvh => {
                scene.bvh().traverse(ray, self.descent, |ray, refs| {
                    for r in refs {
                        let surface = scene.surface(r);
                        if surface.bounds.intersect_p(ray) {
                            test_surface(surface, ray, search, &mut closest);
                        }
                    }
                });
            }
        }

        closest
    }
}

#[inline]
fn test_surface(surface: &Surface, ray: &mut Ray, search: TriangleSearch, closest: &mut Option<Interaction>) {
    if let Some(si) = surface.intersect(ray, search) {
        if si.t <= ray.t_max {
            ray.t_max = si.t;
            *closest = Some(si);
        }
    }
}
