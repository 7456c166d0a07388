/// Partition Module - Data-Oriented Programming (DOP) style
///
/// Splits a scene into ground-contact cells by sweeping boxes down from a seed.
///
/// - box_trace_data.rs: settings, per-run config, sweep state and output table
/// - box_trace_operations.rs: the quadrant sweep, seed search, batching and table output
///

pub mod box_trace_data;
pub mod box_trace_operations;

pub use box_trace_data::{
    BoxTraceConfig, BoxTraceSettings, BoxTraceState, QuadrantEnd, SweepCell, SweepTable,
    TraceBorder,
};

pub use box_trace_operations::{
    // Configuration
    init_box_trace_config,
    config_from_settings,
    validate_box_trace_config,
    trace_border,
    is_within_border,
    init_box_trace_state,

    // Probes
    test_inside,
    test_visible,

    // Sweep
    sweep_quadrant,
    divide_scene_via_box_trace,

    // Seeds
    find_random_seed,

    // Table output
    render_sweep_table,
    write_sweep_table,

    // Batch
    batch_output_path,
    divide_scene_batch,
};
