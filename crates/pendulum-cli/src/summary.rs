use console::Style;
use pendulum_core::physics::FrequencyConvention;
use pendulum_core::tracker::{Analysis, FinishReason, RunRecord};

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    warn: Style,
    disabled: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            warn: Style::new().yellow(),
            disabled: Style::new().dim().yellow(),
        }
    }
}

pub fn print_run_summary(record: &RunRecord, reason: &FinishReason) {
    let s = Styles::new();

    println!();
    println!("  {}", s.title.apply_to("Tracking Run"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(12)));
    println!();

    let reason_style = match reason {
        FinishReason::SourceError(_) => &s.warn,
        _ => &s.value,
    };
    println!("  {:<14}{}", s.label.apply_to("Finished"), reason_style.apply_to(reason));
    println!("  {:<14}{}", s.label.apply_to("Frames"), s.value.apply_to(record.frames_processed));
    println!(
        "  {:<14}{}",
        s.label.apply_to("Frame rate"),
        s.value.apply_to(format!("{:.3} fps", record.frame_rate))
    );
    println!("  {:<14}{}", s.label.apply_to("Samples"), s.value.apply_to(record.samples.len()));
    println!("  {:<14}{}", s.label.apply_to("Series"), s.value.apply_to(record.series.len()));
    println!();

    println!("  {}", s.header.apply_to("Geometry"));
    match record.circle {
        Some(c) => {
            println!(
                "    {:<12}{}",
                s.label.apply_to("Pivot"),
                s.value.apply_to(format!("({:.1}, {:.1}) px", c.center_x, c.center_y))
            );
            println!(
                "    {:<12}{}",
                s.label.apply_to("Radius"),
                s.value.apply_to(format!("{:.1} px", c.radius))
            );
            println!(
                "    {:<12}{}",
                s.label.apply_to("Rotation"),
                s.value.apply_to(format!("{:.4} rad", c.rotation_angle))
            );
        }
        None => println!("    {}", s.disabled.apply_to("no circle fit")),
    }
    if let Some(r) = record.bob_radius {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Bob radius"),
            s.value.apply_to(format!("{:.1} px", r))
        );
    }
    println!();
}

pub fn print_analysis(analysis: &Analysis) {
    let s = Styles::new();
    let p = &analysis.params;

    println!("  {}", s.header.apply_to("Oscillator Fit"));
    println!("    {:<12}{}", s.label.apply_to("Samples"), s.value.apply_to(analysis.samples));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Amplitude"),
        s.value.apply_to(format!("{:.4}", p.amplitude))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Damping"),
        s.value.apply_to(format!("{:.6} 1/s", p.damping))
    );
    match analysis.convention {
        FrequencyConvention::AngularFrequency => println!(
            "    {:<12}{}",
            s.label.apply_to("Omega"),
            s.value.apply_to(format!("{:.6} rad/s", p.angular_frequency))
        ),
        FrequencyConvention::Hertz => println!(
            "    {:<12}{}",
            s.label.apply_to("Frequency"),
            s.value.apply_to(format!("{:.6} Hz", p.frequency_hz()))
        ),
    }
    println!(
        "    {:<12}{}",
        s.label.apply_to("Phase"),
        s.value.apply_to(format!("{:.4} rad", p.phase))
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Offset"),
        s.value.apply_to(format!("{:.4}", p.offset))
    );
    println!();

    println!("  {}", s.header.apply_to("Derived"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Length"),
        s.value.apply_to(format!("{:.4} m", analysis.length))
    );
    match analysis.surface_length {
        Some(l) => println!(
            "    {:<12}{}",
            s.label.apply_to("To surface"),
            s.value.apply_to(format!("{:.4} m", l))
        ),
        None => println!(
            "    {:<12}{}",
            s.label.apply_to("To surface"),
            s.disabled.apply_to("undefined")
        ),
    }
    println!();
}
