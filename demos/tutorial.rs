fn main() {
    env_logger::init();

    /*
     * Building meshes
     */
    use meshseam::{AttribKind, Mesh};

    // A triangle and a lone vertex sitting on the midpoint of its bottom edge.
    let positions = vec![
        0.0, 0.0, 0.0, //
        10.0, 0.0, 0.0, //
        5.0, 10.0, 0.0, //
        5.0, 0.0, 0.0,
    ];
    let uvs = vec![0.0, 0.0, 1.0, 0.0, 0.5, 1.0];

    let mut mesh = Mesh::new();
    mesh.add_stream(AttribKind::Position, positions, vec![0, 1, 2])
        .expect("Failed to add positions");
    mesh.add_stream(AttribKind::TexCoord, uvs, vec![0, 1, 2])
        .expect("Failed to add texture coordinates");
    mesh.add_batch(0, 3);

    println!("number of triangles: {}", mesh.num_triangles());

    /*
     * Crack repair
     */

    let fixed = mesh
        .fix_t_junctions()
        .expect("Failed to fix T-junctions");
    println!("fixed {} T-junctions", fixed);
    println!("number of triangles: {}", mesh.num_triangles());
    println!("batches: {:?}", mesh.batches());

    /*
     * Simple transforms
     */

    mesh.flip_position_z().expect("Mesh has positions");
    mesh.invert_v().expect("Mesh has texture coordinates");

    /*
     * IO: saving and loading meshes
     */

    meshseam::io::save_mesh(&mesh, "tests/artifacts/tutorial.obj")
        .expect("Failed to save the tutorial mesh");

    let loaded = meshseam::io::load_mesh("tests/artifacts/tutorial.obj")
        .expect("Failed to load the tutorial mesh");

    assert_eq!(mesh, loaded);
}
