pub mod measurement_generator;
pub mod report_writer;

pub use measurement_generator::MeasurementGenerator;
pub use report_writer::ReportFormatter;
