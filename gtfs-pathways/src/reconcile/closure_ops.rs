use crate::model::{StopRecord, Table};
use itertools::Itertools;
use std::collections::{HashMap, HashSet};

/// computes the set of stop ids reachable downward from the roots along the
/// parent_station relation: each root, its children, their children, and so on.
///
/// roots missing from the stops table are kept in the result but never expand.
/// each pass scans the full table and adds the stops whose parent is already in
/// the set; the search ends on the first pass that adds nothing. a stop already
/// in the set is never added twice, so a cyclic parent_station relation cannot
/// keep the loop alive. cycles are not reported here, see [`find_parent_cycles`].
pub fn resolve_closure<I, S>(roots: I, stops: &Table<StopRecord>) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut in_scope: HashSet<String> = roots
        .into_iter()
        .map(|r| r.as_ref().to_string())
        .collect();

    let mut iteration = 0;
    loop {
        let children = stops
            .iter()
            .filter(|stop| match &stop.parent_station {
                Some(parent) => in_scope.contains(parent) && !in_scope.contains(&stop.stop_id),
                None => false,
            })
            .map(|stop| stop.stop_id.clone())
            .collect_vec();
        if children.is_empty() {
            break;
        }
        iteration += 1;
        log::debug!(
            "closure pass {iteration}: added {} stops to scope",
            children.len()
        );
        in_scope.extend(children);
    }
    in_scope
}

/// finds parent_station cycles reachable from the stops in scope. each cycle
/// is reported once, listed from the first stop on the cycle that was
/// reached, in the direction of the parent relation.
pub fn find_parent_cycles<'a>(
    stops: &'a Table<StopRecord>,
    scope: &'a HashSet<String>,
) -> Vec<Vec<String>> {
    let parents: HashMap<&str, &str> = stops
        .iter()
        .filter_map(|s| {
            s.parent_station
                .as_deref()
                .map(|parent| (s.stop_id.as_str(), parent))
        })
        .collect();

    let mut settled: HashSet<&str> = HashSet::new();
    let mut cycles = vec![];
    for start in scope.iter().sorted() {
        let mut path: Vec<&str> = vec![];
        let mut on_path: HashMap<&str, usize> = HashMap::new();
        let mut current = Some(start.as_str());
        while let Some(stop_id) = current {
            if settled.contains(stop_id) {
                break;
            }
            if let Some(&pos) = on_path.get(stop_id) {
                cycles.push(path[pos..].iter().map(|s| s.to_string()).collect_vec());
                break;
            }
            on_path.insert(stop_id, path.len());
            path.push(stop_id);
            current = parents.get(stop_id).copied();
        }
        settled.extend(path);
    }
    cycles
}
