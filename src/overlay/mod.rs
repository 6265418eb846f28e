//! Area-weighted redistribution of regressor attributes onto a discretization.

mod columns;
mod engine;
mod fragment;
mod policy;
mod regressor;

pub use columns::{classify_columns, ColumnClass};
pub use engine::overlay_regressor;
pub use fragment::{overlay_fragments, Fragment};
pub use policy::AllocationPolicy;
pub use regressor::Regressor;

#[cfg(test)]
mod tests {
    use geo::{polygon, Geometry, MultiPolygon};
    use polars::prelude::*;

    use super::*;
    use crate::{
        discretization::{assemble, generate_rect_discretization, Discretization, Tessellation},
        error::{DiscretizeError, Warning},
        graph::Neighborhood,
        region::Region,
    };

    fn square(x: f64, y: f64, size: f64) -> MultiPolygon<f64> {
        MultiPolygon(vec![polygon![
            (x: x, y: y), (x: x + size, y: y), (x: x + size, y: y + size), (x: x, y: y + size)]])
    }

    /// Two unit cells side by side plus a far-away cell, with a user column.
    fn cells() -> Discretization {
        let data = DataFrame::new(vec![Column::new("pop".into(), [-1.0, -1.0, -1.0])]).unwrap();
        assemble(Tessellation {
            ids: vec!["a".into(), "b".into(), "far".into()],
            geometries: vec![square(0.0, 0.0, 1.0), square(1.0, 0.0, 1.0), square(10.0, 10.0, 1.0)],
            neighbors: vec![vec![1], vec![0], vec![]],
            areas: None,
        }, Some(data)).unwrap()
    }

    /// One 2x1 record over both near cells, one record covering half of cell b only.
    fn census() -> Regressor {
        let data = DataFrame::new(vec![
            Column::new("pop".into(), [100i64, 40]),
            Column::new("bairro".into(), ["Centro", "Lapa"]),
            Column::new("area".into(), [2.0, 0.5]),
        ]).unwrap();
        let half_of_b = MultiPolygon(vec![polygon![(x: 1.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 0.5), (x: 1.0, y: 0.5)]]);
        let both = MultiPolygon(vec![polygon![(x: 0.0, y: 0.0), (x: 2.0, y: 0.0), (x: 2.0, y: 1.0), (x: 0.0, y: 1.0)]]);
        Regressor::new(vec![both, half_of_b], data).unwrap()
    }

    fn column(d: &Discretization, name: &str) -> Vec<f64> {
        d.values(name).unwrap()
    }

    #[test]
    fn uniform_distribution_conserves_record_totals() {
        let out = overlay_regressor(&cells(), &census(), AllocationPolicy::UniformDistribution, "id", Some(&["pop".to_string()]))
            .unwrap();
        let pop = column(&out.value, "pop");
        // a: 100/2; b: 100/2 + 40 (record fully inside b); far: nothing.
        assert!((pop[0] - 50.0).abs() < 1e-9);
        assert!((pop[1] - 90.0).abs() < 1e-9);
        assert_eq!(pop[2], 0.0);
        assert!((pop.iter().sum::<f64>() - 140.0).abs() < 1e-9);
    }

    #[test]
    fn weighted_average_uses_cell_share() {
        let out = overlay_regressor(&cells(), &census(), AllocationPolicy::WeightedAverage, "id", Some(&["pop".to_string()]))
            .unwrap();
        let pop = column(&out.value, "pop");
        // a: fully covered by record 0; b: record 0 fully, record 1 over half the cell.
        assert!((pop[0] - 100.0).abs() < 1e-9);
        assert!((pop[1] - 120.0).abs() < 1e-9);
        assert_eq!(pop[2], 0.0);
    }

    #[test]
    fn text_column_is_skipped_with_warning() {
        let out = overlay_regressor(&cells(), &census(), AllocationPolicy::UniformDistribution, "id", None).unwrap();
        assert!(out.value.data().column("bairro").is_err());
        assert_eq!(out.warnings.len(), 1);
        assert!(matches!(&out.warnings[0],
            Warning::ColumnSkipped { column, cause: DiscretizeError::NonNumericColumn { .. } } if column == "bairro"));
    }

    #[test]
    fn reserved_names_get_a_suffix_and_user_columns_are_replaced() {
        let input = cells();
        let out = overlay_regressor(&input, &census(), AllocationPolicy::UniformDistribution, "id", None).unwrap();
        let names = out.value.data().get_column_names().iter().map(|n| n.to_string()).collect::<Vec<_>>();
        assert!(names.contains(&"area_regressor".to_string()));
        assert_eq!(names.iter().filter(|n| n.as_str() == "pop").count(), 1);

        // The discretization's own area is untouched, and so is the input table.
        assert_eq!(column(&out.value, "area"), column(&input, "area"));
        assert_eq!(column(&input, "pop"), vec![-1.0, -1.0, -1.0]);
        assert_eq!(out.value.ids(), input.ids());
    }

    #[test]
    fn no_overlap_gives_zeros_not_nulls() {
        let data = DataFrame::new(vec![Column::new("jobs".into(), [7.0])]).unwrap();
        let remote = Regressor::new(vec![square(50.0, 50.0, 1.0)], data).unwrap();
        let out = overlay_regressor(&cells(), &remote, AllocationPolicy::WeightedAverage, "id", None).unwrap();
        assert_eq!(column(&out.value, "jobs"), vec![0.0, 0.0, 0.0]);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn colliding_output_names_skip_the_later_column() {
        let data = DataFrame::new(vec![
            Column::new("pop".into(), [100i64, 40]),
            Column::new("area".into(), [2.0, 0.5]),
            Column::new("area_regressor".into(), [8.0, 4.0]),
        ]).unwrap();
        let regressor = Regressor::new(census().geometries().to_vec(), data).unwrap();
        let out = overlay_regressor(&cells(), &regressor, AllocationPolicy::UniformDistribution, "id", None).unwrap();

        // `area` claims `area_regressor` first; the literal column is left out.
        let close = |got: Vec<f64>, want: [f64; 3]| got.iter().zip(want).all(|(g, w)| (g - w).abs() < 1e-9);
        assert!(close(column(&out.value, "area_regressor"), [1.0, 1.5, 0.0]));
        assert!(close(column(&out.value, "pop"), [50.0, 90.0, 0.0]));
        assert_eq!(out.warnings.len(), 1);
        assert!(matches!(&out.warnings[0],
            Warning::ColumnSkipped { column, cause: DiscretizeError::ColumnProcessingError { .. } }
                if column == "area_regressor"));
    }

    #[test]
    fn split_square_pieces_keep_their_own_values() {
        let strip = |y0: f64, y1: f64| Geometry::Polygon(polygon![
            (x: 0.0, y: y0), (x: 1.0, y: y0), (x: 1.0, y: y1), (x: 0.0, y: y1)]);
        let region = Region::new(vec![strip(0.0, 1.4), strip(1.6, 3.0)]);
        let grid = generate_rect_discretization(&region, 1, 3, Neighborhood::Rook).unwrap();
        assert_eq!(grid.len(), 4);

        let data = DataFrame::new(vec![Column::new("pop".into(), [280.0])]).unwrap();
        let tract = Regressor::new(vec![MultiPolygon(vec![
            polygon![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 3.0), (x: 0.0, y: 3.0)]])], data).unwrap();

        // Pieces of one square share `grid_index`, so it cannot be the join column.
        let err = overlay_regressor(&grid, &tract, AllocationPolicy::UniformDistribution, "grid_index", None).unwrap_err();
        assert!(matches!(err, DiscretizeError::InvalidParameter { name: "id_column", .. }));

        let out = overlay_regressor(&grid, &tract, AllocationPolicy::UniformDistribution, "id", None).unwrap();
        let pop = column(&out.value, "pop");
        assert!((pop[1] - 280.0 * 0.4 / 3.0).abs() < 1e-9);
        assert!((pop[2] - 280.0 * 0.4 / 3.0).abs() < 1e-9);
        assert!((pop.iter().sum::<f64>() - 280.0 * 2.8 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn unknown_id_column_is_invalid() {
        let err = overlay_regressor(&cells(), &census(), AllocationPolicy::WeightedAverage, "cell", None).unwrap_err();
        assert!(matches!(err, DiscretizeError::InvalidParameter { name: "id_column", .. }));
    }
}
