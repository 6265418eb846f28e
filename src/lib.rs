#![doc = "Discretization of study regions into hexagonal or rectangular cells, with area-weighted regressor overlay and travel-time matrices"]
pub mod config;
pub mod cover;
pub mod discretization;
pub mod error;
pub mod geom;
pub mod graph;
pub mod index;
pub mod io;
pub mod overlay;
pub mod region;
pub mod travel;

#[doc(inline)]
pub use config::RoutingConfig;

#[doc(inline)]
pub use discretization::{
    from_export_friendly, generate_discretization, generate_discretization_frame, to_export_friendly,
    Discretization, ShapeKind, ShapeSpec,
};

#[doc(inline)]
pub use error::{DiscretizeError, DiscretizeResult, Outcome, Warning};

#[doc(inline)]
pub use geom::Crs;

#[doc(inline)]
pub use graph::Neighborhood;

#[doc(inline)]
pub use index::{CellIndexer, Containment, H3Indexer};

#[doc(inline)]
pub use overlay::{overlay_regressor, AllocationPolicy, Regressor};

#[doc(inline)]
pub use region::Region;

#[doc(inline)]
pub use travel::{build_travel_time_matrix, Batching, TravelTimeService};

#[cfg(feature = "routing")]
#[doc(inline)]
pub use travel::GraphHopperClient;
