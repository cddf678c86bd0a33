//! WGSL sources for the two per-frame programs.
//!
//! Every numeric literal here is mirrored by [`crate::gpu::parity`]; change
//! them in both places or the parity tests will disagree with the picture.

/// Surface-displacement program: dissolves the newspaper plane.
///
/// Bind group 0: `globals` (view-proj + model matrices, supplied by the
/// rendering backend), `params` ([`crate::gpu::SurfaceUniforms`]), the page
/// texture, and its sampler.
pub const SURFACE_SHADER: &str = r#"
struct Globals {
    view_proj: mat4x4<f32>,
    model: mat4x4<f32>,
};

struct SurfaceParams {
    time: f32,
    dissolve: f32,
    noise_scale: f32,
    spin_y: f32,
    spin_z: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(0) @binding(0) var<uniform> globals: Globals;
@group(0) @binding(1) var<uniform> params: SurfaceParams;
@group(0) @binding(2) var page_tex: texture_2d<f32>;
@group(0) @binding(3) var page_samp: sampler;

fn hash2(st: vec2<f32>) -> f32 {
    return fract(sin(dot(st, vec2<f32>(12.9898, 78.233))) * 43758.547);
}

fn value_noise2(st: vec2<f32>) -> f32 {
    let i = floor(st);
    let f = fract(st);
    let a = hash2(i);
    let b = hash2(i + vec2<f32>(1.0, 0.0));
    let c = hash2(i + vec2<f32>(0.0, 1.0));
    let d = hash2(i + vec2<f32>(1.0, 1.0));
    let u = f * f * (3.0 - 2.0 * f);
    return a + (b - a) * u.x + (c - a) * u.y * (1.0 - u.x) + (d - b) * u.x * u.y;
}

struct VsIn {
    @location(0) position: vec3<f32>,
    @location(1) uv: vec2<f32>,
};

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) noise: f32,
};

@vertex
fn vs_main(in: VsIn) -> VsOut {
    var pos = in.position;

    // Horizontal wave while the page tears apart.
    pos.x += sin(pos.y * 10.0 + params.time * 5.0) * 0.05 * params.dissolve;

    // Drifting noise field decides which fragments survive.
    let n = value_noise2(in.position.xy * params.noise_scale + vec2<f32>(params.time * 0.2));

    // Lift up and back rather than exploding outward.
    pos += vec3<f32>(0.0, 1.0, 0.5) * params.dissolve * n * 5.0;

    // Per-vertex jitter.
    pos.x += (hash2(in.uv + vec2<f32>(params.time)) - 0.5) * 0.1 * params.dissolve;

    var out: VsOut;
    out.clip = globals.view_proj * globals.model * vec4<f32>(pos, 1.0);
    out.uv = in.uv;
    out.noise = n;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    var color = textureSample(page_tex, page_samp, in.uv);

    let threshold = params.dissolve * 1.8;
    let edge = 0.05;

    if in.noise < threshold - edge {
        discard;
    }
    if in.noise < threshold {
        // Energy edge.
        color = vec4<f32>(vec3<f32>(0.2, 0.8, 1.0) * 2.0, 1.0);
    }

    let grid = step(0.9, fract(in.uv.x * 50.0)) + step(0.9, fract(in.uv.y * 50.0));
    if params.dissolve > 0.0 && grid > 0.5 && in.noise < threshold + 0.2 {
        color = vec4<f32>(color.rgb + vec3<f32>(0.0, 0.5, 1.0) * 0.5, color.a);
    }

    return color;
}
"#;

/// Particle-morph program: scattered page fragments form the eye.
///
/// Particles draw as camera-facing quads, four vertices per instance. The
/// per-instance buffers are the three static arrays uploaded once at
/// startup; `params` is [`crate::gpu::ParticleUniforms`].
pub const PARTICLE_SHADER: &str = r#"
struct Camera {
    view: mat4x4<f32>,
    proj: mat4x4<f32>,
    viewport: vec2<f32>,
    _pad: vec2<f32>,
};

struct ParticleParams {
    time: f32,
    formation: f32,
    explosion: f32,
    convergence: f32,
    color_ink: vec3<f32>,
    pixel_ratio: f32,
    color_accent: vec3<f32>,
    _pad: f32,
};

@group(0) @binding(0) var<uniform> camera: Camera;
@group(0) @binding(1) var<uniform> params: ParticleParams;

fn ease_in_out_cubic(x: f32) -> f32 {
    if x < 0.5 {
        return 4.0 * x * x * x;
    }
    let f = -2.0 * x + 2.0;
    return 1.0 - f * f * f / 2.0;
}

struct VsIn {
    @builtin(vertex_index) corner_index: u32,
    @location(0) initial_pos: vec3<f32>,
    @location(1) target_pos: vec3<f32>,
    @location(2) stagger: f32,
};

struct VsOut {
    @builtin(position) clip: vec4<f32>,
    @location(0) sprite_uv: vec2<f32>,
    @location(1) color: vec3<f32>,
    @location(2) alpha: f32,
};

@vertex
fn vs_main(in: VsIn) -> VsOut {
    // Staggered arrival: each particle runs its own eased clock.
    var progress = smoothstep(0.0, 1.0, params.formation * 1.5 - in.stagger * 0.5);
    progress = ease_in_out_cubic(clamp(progress, 0.0, 1.0));

    var pos = mix(in.initial_pos, in.target_pos, vec3<f32>(progress));

    // Turbulence peaks mid-transition and vanishes at both endpoints.
    let turbulence = sin(params.time * 5.0 + in.stagger * 10.0) * sin(progress * 3.14159265);
    pos += vec3<f32>(turbulence * 0.5);

    // Once formed, the eye keeps a slow per-particle spin.
    if progress > 0.8 {
        let angle = params.time * 0.2 * (1.0 + in.stagger * 0.5);
        let s = sin(angle);
        let c = cos(angle);
        pos = vec3<f32>(pos.x * c - pos.z * s, pos.y, pos.x * s + pos.z * c);
    }

    // Climax layer: outward burst, then pull-in toward the final still.
    if params.explosion > 0.0 {
        var dir = vec3<f32>(0.0, 0.0, 1.0);
        if length(pos) > 1e-4 {
            dir = normalize(pos);
        }
        pos += dir * params.explosion * params.explosion * (0.5 + in.stagger) * 6.0;
    }
    pos *= 1.0 - params.convergence * 0.85;

    let view_pos = camera.view * vec4<f32>(pos, 1.0);
    let size_px = (4.0 + in.stagger * 3.0) * params.pixel_ratio * (15.0 / -view_pos.z);

    var corners = array<vec2<f32>, 4>(
        vec2<f32>(-0.5, -0.5),
        vec2<f32>(0.5, -0.5),
        vec2<f32>(-0.5, 0.5),
        vec2<f32>(0.5, 0.5),
    );
    let corner = corners[in.corner_index];

    var clip = camera.proj * view_pos;
    let ndc_offset = corner * size_px * 2.0 / camera.viewport;
    clip = vec4<f32>(clip.xy + ndc_offset * clip.w, clip.zw);

    var alpha = 1.0;
    if params.formation < 0.1 {
        alpha = params.formation * 10.0;
    }
    alpha *= 1.0 - params.convergence * 0.7;

    var color = mix(params.color_ink, params.color_accent, vec3<f32>(progress * progress));
    color *= 1.0 + params.explosion * 2.0;

    var out: VsOut;
    out.clip = clip;
    out.sprite_uv = corner + vec2<f32>(0.5);
    out.color = color;
    out.alpha = alpha;
    return out;
}

@fragment
fn fs_main(in: VsOut) -> @location(0) vec4<f32> {
    let r = distance(in.sprite_uv, vec2<f32>(0.5));
    if r > 0.5 {
        discard;
    }
    var glow = 1.0 - r * 2.0;
    glow = pow(glow, 1.5);
    return vec4<f32>(in.color, in.alpha * glow);
}
"#;
