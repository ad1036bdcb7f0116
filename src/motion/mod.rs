/// Ken Burns scale curves and centered cover transforms.
pub mod curve;
