//! Year-anchored citation network: payload decoding, graph construction,
//! layout simulation and the canvas component that ties them together.

pub mod adapt;
mod component;
pub mod config;
pub mod error;
pub mod graph;
mod legend;
mod render;
pub mod resolve;
pub mod scale;
pub mod simulation;
pub mod state;
pub mod tooltip;
pub mod types;

pub use adapt::adapt;
pub use component::CitationGraphCanvas;
pub use config::{LayoutConfig, Margins, SizeConfig};
pub use error::{CanvasError, PayloadError};
pub use graph::{CitationGraph, Edge, EdgeKind, GraphBuilder, Node, NodeIndex};
pub use legend::CitationLegend;
pub use resolve::Resolver;
pub use scale::YearScale;
pub use simulation::Simulation;
pub use state::GraphView;
pub use types::{CitationPayload, CitationResponse, CourtType, Document, DocumentId};
