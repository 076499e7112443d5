use std::collections::{HashSet, VecDeque};

use super::types::{Direction, Point};

/// Snake body, head first. `occupied` mirrors `body` for O(1) cell tests.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Point>,
    occupied: HashSet<Point>,
}

impl Snake {
    /// Builds a snake of `length` segments with the body trailing behind
    /// `head`, opposite to `heading`. The caller places the head far enough
    /// from the edges for the whole body to fit on the grid.
    pub fn spawn(head: Point, heading: Direction, length: usize) -> Self {
        let (dx, dy): (isize, isize) = match heading {
            Direction::Up => (0, 1),
            Direction::Down => (0, -1),
            Direction::Left => (1, 0),
            Direction::Right => (-1, 0),
        };

        let mut body = VecDeque::with_capacity(length);
        let mut occupied = HashSet::with_capacity(length);
        for i in 0..length {
            let offset = i as isize;
            let segment = Point::new(
                (head.x as isize + dx * offset) as usize,
                (head.y as isize + dy * offset) as usize,
            );
            body.push_back(segment);
            occupied.insert(segment);
        }

        Self { body, occupied }
    }

    pub fn head(&self) -> Point {
        *self.body.front().expect("snake body is never empty")
    }

    pub fn tail(&self) -> Point {
        *self.body.back().expect("snake body is never empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: Point) -> bool {
        self.occupied.contains(&cell)
    }

    pub fn segments(&self) -> impl Iterator<Item = Point> + '_ {
        self.body.iter().copied()
    }

    /// Successor body: `new_head` prepended, tail dropped unless growing.
    /// `new_head` must not collide with the current body; collision checks
    /// happen before the move is committed.
    pub fn advance(&self, new_head: Point, grow: bool) -> Snake {
        let mut next = self.clone();
        next.body.push_front(new_head);
        next.occupied.insert(new_head);
        if !grow
            && let Some(tail) = next.body.pop_back()
        {
            next.occupied.remove(&tail);
        }
        next
    }

    #[cfg(test)]
    pub(crate) fn from_segments(head_first: Vec<Point>) -> Self {
        let occupied = head_first.iter().copied().collect();
        Self {
            body: head_first.into(),
            occupied,
        }
    }
}
