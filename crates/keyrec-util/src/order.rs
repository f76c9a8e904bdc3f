//! Access-order editing.
//!
//! The hinted recovery variant promotes people named by freshly learned
//! hints so they are visited next. Only the unvisited suffix of the order
//! is rearranged; the visited prefix is the trial's history and stays put.

/// Removes the element at `from` and reinserts it at `to`.
pub fn move_element(order: &mut Vec<usize>, from: usize, to: usize) {
    let value = order.remove(from);
    order.insert(to, value);
}

/// Promotes every hinted, not-yet-visited person to the front of the
/// unvisited suffix (`order[visited..]`).
///
/// A hinted person already visited, or already next in line, is left
/// alone. When several hints are pending, each newly promoted person is
/// placed behind the hinted people already promoted ahead of them.
pub fn promote_hinted(order: &mut Vec<usize>, hinted: &[usize], visited: usize) {
    if visited >= order.len() {
        return;
    }
    let approached: Vec<usize> = order[..visited].to_vec();
    for &person in hinted {
        if approached.contains(&person) {
            continue;
        }
        let old_index = match order.iter().position(|&p| p == person) {
            Some(i) => i,
            None => continue,
        };
        if old_index == visited {
            continue;
        }
        // First unvisited slot not already claimed by another hinted person.
        let mut new_index = visited;
        while hinted.contains(&order[new_index]) {
            new_index += 1;
            if new_index == order.len() - 1 {
                break;
            }
        }
        if old_index != new_index {
            move_element(order, old_index, new_index);
        }
    }
}
