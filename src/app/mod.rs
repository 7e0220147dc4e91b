// Presentation side: turns an AnalysisReport into console text or JSON.

pub mod render;
