use argh::FromArgs;

use quadwarp::{
    geometry::{quad_to_rect, DVec2, Quadrangle, Rect},
    image::{Image, ImageSize},
    imgproc::{
        fill::FillPolicy,
        interpolation::InterpolationMode,
        parallel::ExecutionStrategy,
        warp::TransformOp,
    },
};

#[derive(FromArgs)]
/// Rectify a quadrangle of a synthetic checkerboard
struct Args {
    /// width and height of the checkerboard
    #[argh(option, short = 's', default = "256")]
    size: usize,

    /// side of a checkerboard square in pixels
    #[argh(option, default = "16")]
    square: usize,

    /// interpolation mode: nearest, bilinear or bicubic
    #[argh(option, short = 'i', default = "String::from(\"bilinear\")")]
    interpolation: String,

    /// background policy: none, transparent, black or white
    #[argh(option, short = 'f', default = "String::from(\"black\")")]
    fill: String,

    /// number of worker threads, 0 for the global pool, 1 for serial
    #[argh(option, short = 't', default = "0")]
    threads: usize,

    /// quadrangle corners as x0,y0,x1,y1,x2,y2,x3,y3 (clockwise from top-left)
    #[argh(option, short = 'q')]
    quad: Option<String>,
}

fn parse_interpolation(s: &str) -> Result<InterpolationMode, String> {
    match s {
        "nearest" => Ok(InterpolationMode::Nearest),
        "bilinear" => Ok(InterpolationMode::Bilinear),
        "bicubic" => Ok(InterpolationMode::Bicubic),
        _ => Err(format!("unknown interpolation mode: {s}")),
    }
}

fn parse_fill(s: &str) -> Result<FillPolicy, String> {
    match s {
        "none" => Ok(FillPolicy::None),
        "transparent" => Ok(FillPolicy::TransparentFill),
        "black" => Ok(FillPolicy::BlackFill),
        "white" => Ok(FillPolicy::WhiteFill),
        _ => Err(format!("unknown fill policy: {s}")),
    }
}

fn parse_quad(s: &str) -> Result<Quadrangle, String> {
    let v = s
        .split(',')
        .map(|t| t.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid quad coordinate: {e}"))?;
    if v.len() != 8 {
        return Err(format!("expected 8 quad coordinates, got {}", v.len()));
    }
    Ok(Quadrangle::new(
        DVec2::new(v[0], v[1]),
        DVec2::new(v[2], v[3]),
        DVec2::new(v[4], v[5]),
        DVec2::new(v[6], v[7]),
    ))
}

fn checkerboard(size: usize, square: usize) -> Result<Image<u8, 3>, Box<dyn std::error::Error>> {
    let square = square.max(1);
    let mut data = Vec::with_capacity(size * size * 3);
    for y in 0..size {
        for x in 0..size {
            let v = if (x / square + y / square) % 2 == 0 { 230 } else { 25 };
            data.extend_from_slice(&[v, v, v]);
        }
    }
    Ok(Image::new(
        ImageSize {
            width: size,
            height: size,
        },
        data,
    )?)
}

fn mean_intensity(image: &Image<u8, 3>) -> f64 {
    let data = image.as_slice();
    if data.is_empty() {
        return 0.0;
    }
    let sum: u64 = data.iter().map(|&v| u64::from(v)).sum();
    sum as f64 / data.len() as f64
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let interpolation = parse_interpolation(&args.interpolation)?;
    let fill = parse_fill(&args.fill)?;
    let strategy = match args.threads {
        0 => ExecutionStrategy::ParallelRows,
        1 => ExecutionStrategy::Serial,
        n => ExecutionStrategy::Fixed(n),
    };

    let s = args.size as f64;
    let quad = match args.quad.as_deref() {
        Some(q) => parse_quad(q)?,
        None => Quadrangle::new(
            DVec2::new(0.2 * s, 0.1 * s),
            DVec2::new(0.8 * s, 0.2 * s),
            DVec2::new(0.9 * s, 0.9 * s),
            DVec2::new(0.1 * s, 0.8 * s),
        ),
    };

    let src = checkerboard(args.size, args.square)?;
    log::info!("source: {} ({})", src.size(), src.color_model());

    // the quadrangle is stretched over the whole output
    let rect = Rect::new(0, 0, args.size as i64, args.size as i64);
    let m = quad_to_rect(&quad, &rect)?;
    log::info!("transform:\n{m}");

    let op = TransformOp::new(m, interpolation, fill).with_strategy(strategy);
    let bounds = op.destination_bounds(src.size())?;
    log::info!("destination bounds: {bounds:?}");

    let out = op.filter(&src, Some(Image::from_size_val(src.size(), 0)?))?;

    log::info!(
        "mean intensity: source {:.2}, warped {:.2}",
        mean_intensity(&src),
        mean_intensity(&out)
    );

    Ok(())
}
