//! §4.2.2 Loop nesting rule.

use crate::types::Loop;
use std::collections::HashMap;

type Key = (usize, usize);

fn first_point(l: &Loop) -> slicer_geom::Point {
    l.polygon.points()[0]
}

fn contains(l: &Loop, p: slicer_geom::Point) -> bool {
    l.polygon.contains_point(p)
}

/// Nests a flat `by_depth[i]` list of loops (everything registered at
/// shell `i` of the onion loop) into the parent/children tree spec §4.2.2
/// describes: holes first (searching deeper holes, then any contour),
/// then contours from deepest to `d=1` (shallowest containing contour).
/// Returns the depth-0 contour roots, one tree per connected component.
pub fn nest_loops(by_depth: Vec<Vec<Loop>>) -> Vec<Loop> {
    let mut parent: HashMap<Key, Key> = HashMap::new();

    // Pass 1: holes.
    for d in 0..by_depth.len() {
        for (idx, l) in by_depth[d].iter().enumerate() {
            if l.is_contour {
                continue;
            }
            let p = first_point(l);
            let mut found = None;
            'deeper_holes: for d2 in (d + 1)..by_depth.len() {
                for (idx2, cand) in by_depth[d2].iter().enumerate() {
                    if !cand.is_contour && contains(cand, p) {
                        found = Some((d2, idx2));
                        break 'deeper_holes;
                    }
                }
            }
            if found.is_none() {
                'any_contour: for d2 in (0..by_depth.len()).rev() {
                    for (idx2, cand) in by_depth[d2].iter().enumerate() {
                        if cand.is_contour && contains(cand, p) {
                            found = Some((d2, idx2));
                            break 'any_contour;
                        }
                    }
                }
            }
            if let Some(key) = found {
                parent.insert((d, idx), key);
            } else {
                log::warn!("perimeter nesting: hole at depth {d} has no containing contour or hole");
            }
        }
    }

    // Pass 2: contours, deepest first down to depth 1, each attached to
    // the shallowest containing contour.
    for d in (1..by_depth.len()).rev() {
        for (idx, l) in by_depth[d].iter().enumerate() {
            if !l.is_contour {
                continue;
            }
            let p = first_point(l);
            let mut found = None;
            'shallowest: for d2 in 0..d {
                for (idx2, cand) in by_depth[d2].iter().enumerate() {
                    if cand.is_contour && contains(cand, p) {
                        found = Some((d2, idx2));
                        break 'shallowest;
                    }
                }
            }
            if let Some(key) = found {
                parent.insert((d, idx), key);
            }
        }
    }

    let mut children_of: HashMap<Key, Vec<Key>> = HashMap::new();
    for (&child, &par) in parent.iter() {
        children_of.entry(par).or_default().push(child);
    }

    let mut grid: Vec<Vec<Option<Loop>>> =
        by_depth.into_iter().map(|d| d.into_iter().map(Some).collect()).collect();

    fn build(key: Key, grid: &mut [Vec<Option<Loop>>], children_of: &HashMap<Key, Vec<Key>>) -> Loop {
        let mut l = grid[key.0][key.1].take().expect("each loop is visited exactly once");
        if let Some(kids) = children_of.get(&key) {
            for &k in kids {
                l.children.push(build(k, grid, children_of));
            }
        }
        l
    }

    let mut roots = Vec::new();
    if let Some(depth0) = grid.first() {
        for (idx, l) in depth0.iter().enumerate() {
            if let Some(l) = l {
                if l.is_contour && !parent.contains_key(&(0, idx)) {
                    roots.push((0, idx));
                }
            }
        }
    }
    roots.into_iter().map(|k| build(k, &mut grid, &children_of)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PerimeterRole;
    use slicer_test_fixtures::square_with_square_hole;

    #[test]
    fn square_with_hole_nests_one_child() {
        let ex = square_with_square_hole(100.0, 50.0);
        let outer = Loop::new_uniform(ex.outer().clone(), 0, true, PerimeterRole::Perimeter);
        let hole = Loop::new_uniform(ex.holes()[0].clone(), 0, false, PerimeterRole::Perimeter);
        let roots = nest_loops(vec![vec![outer, hole]]);
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].children.len(), 1);
    }
}
