use anyhow::Result;
use burn::tensor::backend::Backend;

use super::matrix::{self, Matrix};
use crate::game::{Board, Cell};

/// Numeric value of a cell as seen by the network
pub fn cell_value(cell: Cell) -> f32 {
    match cell {
        Cell::Border => -1.0,
        Cell::Snake | Cell::Food => 1.0,
        Cell::Empty => 0.0,
    }
}

/// Encode the board as a single-channel observation
///
/// Returns a matrix with shape [size_y, size_x]: border -1, snake and food
/// +1, empty 0.
pub fn create_observation<B: Backend>(board: &Board, device: &B::Device) -> Result<Matrix<B>> {
    let data = board.cells().iter().map(|&cell| cell_value(cell)).collect();
    matrix::from_vec(data, board.size_y(), board.size_x(), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Point;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_observation_shape() {
        let device = NdArrayDevice::default();
        let board = Board::new(12, 8, 1);

        let obs = create_observation::<TestBackend>(&board, &device).unwrap();

        assert_eq!(matrix::shape(&obs), (8, 12));
    }

    #[test]
    fn test_observation_values() {
        let device = NdArrayDevice::default();
        let mut board = Board::new(10, 10, 1);
        board.set_snake(Point::new(3, 2), true);
        board.place_food(Point::new(6, 7));

        let obs = create_observation::<TestBackend>(&board, &device).unwrap();
        let data = matrix::to_vec(&obs).unwrap();

        assert_eq!(data[0], -1.0); // Top-left border
        assert_eq!(data[2 * 10 + 3], 1.0); // Snake
        assert_eq!(data[7 * 10 + 6], 1.0); // Food
        assert_eq!(data[5 * 10 + 5], 0.0); // Empty

        let border_sum: f32 = data.iter().filter(|&&v| v < 0.0).sum();
        assert_eq!(border_sum, -((2 * 10 + 2 * 10 - 4) as f32));
    }

    #[test]
    fn test_observation_values_in_range() {
        let device = NdArrayDevice::default();
        let board = Board::new(10, 10, 1);

        let obs = create_observation::<TestBackend>(&board, &device).unwrap();

        for value in matrix::to_vec(&obs).unwrap() {
            assert!(value == -1.0 || value == 0.0 || value == 1.0);
        }
    }
}
