//! Built-in demo scenes.
//!
//! Every builder draws its random content from the caller's source and then
//! uses the same source to build the BVH, so one seed fixes the whole scene.

use ember_math::Vec3;
use ember_renderer::{
    Camera, Color, Dielectric, Lambertian, Metal, RandomSource, Rectangle, RectanglePlane, Scene,
    Sphere,
};

/// Shutter interval shared by all demo cameras.
pub const SHUTTER_TIME: f32 = 1.0 / 250.0;

const APERTURE: f32 = 0.1;
const SKY: Color = Color::new(0.7, 0.8, 1.0);

fn camera(look_from: Vec3, look_at: Vec3, vfov: f32, focus_dist: f32, aspect_ratio: f32) -> Camera {
    let mut camera = Camera::new()
        .with_position(look_from, look_at, Vec3::Y)
        .with_lens(vfov, APERTURE, focus_dist)
        .with_aspect_ratio(aspect_ratio)
        .with_shutter(SHUTTER_TIME);
    camera.initialize();
    camera
}

/// A handful of spheres on a large ground sphere, including a hollow glass
/// ball and a fast-moving metal one.
pub fn example(rng: &mut RandomSource, aspect_ratio: f32) -> (Scene, Camera) {
    let mut scene = Scene::new();

    let ground = scene.add_material(Lambertian::new(Color::new(0.8, 0.8, 0.0)));
    let ball = scene.add_material(Lambertian::new(Color::new(0.1, 0.2, 0.5)));
    let glass = scene.add_material(Dielectric::new(1.3));
    let metal = scene.add_material(Metal::new(Color::new(0.8, 0.6, 0.2), 0.0));

    scene.add_sphere(Sphere::new(Vec3::new(0.0, -100.5, -1.0), 100.0, ground));
    scene.add_sphere(Sphere::new(Vec3::new(0.0, 0.0, -1.0), 0.5, ball));
    scene.add_sphere(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), 0.5, glass));
    // Negative radius flips the normals: a thin glass shell
    scene.add_sphere(Sphere::new(Vec3::new(-1.0, 0.0, -1.0), -0.45, glass));
    scene.add_sphere(Sphere::moving(
        Vec3::new(1.0, 0.0, -1.0),
        0.5,
        metal,
        Vec3::new(50.0, 0.0, 0.0),
    ));
    scene.set_background_color(SKY);

    let camera = camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0, 10.0, aspect_ratio);
    scene.initialize(SHUTTER_TIME, rng);
    (scene, camera)
}

/// The "final scene": a 22x22 grid of small random spheres around three big ones.
pub fn random(rng: &mut RandomSource, aspect_ratio: f32) -> (Scene, Camera) {
    random_spheres(rng, aspect_ratio, false)
}

/// [`random`] at night: black sky, the big diffuse sphere glows.
pub fn random_dark(rng: &mut RandomSource, aspect_ratio: f32) -> (Scene, Camera) {
    random_spheres(rng, aspect_ratio, true)
}

fn random_spheres(rng: &mut RandomSource, aspect_ratio: f32, dark: bool) -> (Scene, Camera) {
    let mut scene = Scene::new();

    let ground = scene.add_material(Lambertian::new(Color::splat(0.5)));
    scene.add_sphere(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, ground));

    for a in -11..11 {
        for b in -11..11 {
            let choose_mat = rng.real();
            let center = Vec3::new(a as f32 + 0.9 * rng.real(), 0.2, b as f32 + 0.9 * rng.real());
            if (center - Vec3::new(4.0, 0.2, 0.0)).length() <= 0.9 {
                continue;
            }

            let mut velocity = Vec3::ZERO;
            let material = if choose_mat < 0.7 {
                let albedo = rng.vec() * rng.vec();
                velocity.y = rng.real_range(0.0, 25.0);
                scene.add_material(Lambertian::new(albedo))
            } else if choose_mat < 0.9 {
                let albedo = 0.5 * rng.vec() + 0.5;
                let fuzz = rng.real_range(0.0, 0.5);
                scene.add_material(Metal::new(albedo, fuzz))
            } else {
                scene.add_material(Dielectric::new(rng.real_range(1.1, 1.7)))
            };
            scene.add_sphere(Sphere::moving(center, 0.2, material, velocity));
        }
    }

    let glass = scene.add_material(Dielectric::new(1.5));
    scene.add_sphere(Sphere::new(Vec3::new(0.0, 1.0, 0.0), 1.0, glass));

    let brown = Color::new(0.4, 0.2, 0.1);
    let diffuse = if dark {
        Lambertian::emissive(brown, Color::splat(10.0))
    } else {
        Lambertian::new(brown)
    };
    let diffuse = scene.add_material(diffuse);
    scene.add_sphere(Sphere::new(Vec3::new(-4.0, 1.0, 0.0), 1.0, diffuse));

    let metal = scene.add_material(Metal::new(Color::new(0.7, 0.6, 0.5), 0.0));
    scene.add_sphere(Sphere::new(Vec3::new(4.0, 1.0, 0.0), 1.0, metal));

    let camera = camera(Vec3::new(13.0, 2.0, 3.0), Vec3::ZERO, 20.0, 10.0, aspect_ratio);
    scene.initialize(SHUTTER_TIME, rng);
    scene.set_background_color(if dark { Color::ZERO } else { SKY });
    (scene, camera)
}

/// Two spheres lit only by a rectangular area light.
pub fn simple_light(rng: &mut RandomSource, aspect_ratio: f32) -> (Scene, Camera) {
    let look_from = Vec3::new(26.0, 3.0, 6.0);
    let look_at = Vec3::new(0.0, 2.0, 0.0);
    let camera = camera(look_from, look_at, 20.0, (look_from - look_at).length(), aspect_ratio);

    let mut scene = Scene::new();
    let green = scene.add_material(Lambertian::new(Color::new(0.5, 0.8, 0.2)));
    scene.add_sphere(Sphere::new(Vec3::new(0.0, -1000.0, 0.0), 1000.0, green));
    scene.add_sphere(Sphere::new(Vec3::new(0.0, 2.0, 0.0), 2.0, green));

    let light = scene.add_material(Lambertian::emissive(Color::ZERO, Color::splat(4.0)));
    scene.add_rectangle(Rectangle::new(RectanglePlane::Xy, (3.0, 5.0), (1.0, 3.0), -2.0, light));

    scene.initialize(SHUTTER_TIME, rng);
    scene.set_background_color(Color::ZERO);
    (scene, camera)
}

/// The classic box: red and green side walls, white floor, ceiling and back
/// wall, and a small ceiling light.
pub fn cornell_box(rng: &mut RandomSource, aspect_ratio: f32) -> (Scene, Camera) {
    let look_from = Vec3::new(278.0, 278.0, -800.0);
    let look_at = Vec3::new(278.0, 278.0, 0.0);
    let camera = camera(look_from, look_at, 40.0, (look_from - look_at).length(), aspect_ratio);

    let mut scene = Scene::new();
    let red = scene.add_material(Lambertian::new(Color::new(0.65, 0.05, 0.05)));
    let white = scene.add_material(Lambertian::new(Color::splat(0.73)));
    let green = scene.add_material(Lambertian::new(Color::new(0.12, 0.45, 0.15)));
    let light = scene.add_material(Lambertian::emissive(Color::ZERO, Color::splat(15.0)));

    let full = (0.0, 555.0);
    scene.add_rectangle(Rectangle::new(RectanglePlane::Yz, full, full, 555.0, green));
    scene.add_rectangle(Rectangle::new(RectanglePlane::Yz, full, full, 0.0, red));
    scene.add_rectangle(Rectangle::new(RectanglePlane::Zx, (213.0, 343.0), (227.0, 332.0), 554.0, light));
    scene.add_rectangle(Rectangle::new(RectanglePlane::Zx, full, full, 0.0, white));
    scene.add_rectangle(Rectangle::new(RectanglePlane::Zx, full, full, 555.0, white));
    scene.add_rectangle(Rectangle::new(RectanglePlane::Xy, full, full, 555.0, white));

    scene.initialize(SHUTTER_TIME, rng);
    scene.set_background_color(Color::ZERO);
    (scene, camera)
}
