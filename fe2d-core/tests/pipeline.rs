use approx::assert_relative_eq;
use fe2d_core::{
    apply_boundary_conditions, centroid_field, element_stiffnesses, promote_to_lst, quadrisect,
    sample_field, structural_forces, BoundaryCondition, BoundaryKind, Constraint, Direction,
    ElementType, FieldOutput, KernelOptions, LineLoad, LoadProfile, Material, Mesh, PhysicsMode,
    Point2, SampleOptions,
};
use nalgebra::{DMatrix, DVector};

/// 4---3
/// | / |
/// 1---2
fn unit_square() -> Mesh {
    Mesh::from_connectivity(
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ],
        vec![vec![1, 2, 3], vec![1, 3, 4]],
    )
    .unwrap()
}

fn assemble(mesh: &Mesh, ks: &[DMatrix<f64>], ndof: usize) -> DMatrix<f64> {
    let n = mesh.n_nodes() * ndof;
    let mut k = DMatrix::zeros(n, n);
    for (e, ke) in ks.iter().enumerate() {
        let dofs = mesh.element_dofs(e, ndof).unwrap();
        for (a, &i) in dofs.iter().enumerate() {
            for (b, &j) in dofs.iter().enumerate() {
                k[(i, j)] += ke[(a, b)];
            }
        }
    }
    k
}

fn solve(k: DMatrix<f64>, f: DVector<f64>) -> DVector<f64> {
    k.lu().solve(&f).expect("system should be non-singular")
}

#[test]
fn refined_conduction_reproduces_linear_temperature() {
    let mesh = unit_square();
    let bcs = vec![
        BoundaryCondition::line(4, 1, BoundaryKind::Temperature, 0.0).unwrap(),
        BoundaryCondition::line(2, 3, BoundaryKind::Flux, 2.0).unwrap(),
    ];

    let q = quadrisect(&mesh, &bcs, &[], &[]).unwrap();
    let p = promote_to_lst(&q.mesh, &q.boundary_conditions, &[]).unwrap();
    assert!(p.mesh.is_uniform(ElementType::Lst));
    assert_eq!(q.mesh.n_nodes(), 9);
    assert_eq!(p.mesh.n_nodes(), 9 + 16);

    let material = Material::diffusive(2.0).unwrap();
    let ks = element_stiffnesses(&p.mesh, &material, PhysicsMode::Diffusion, KernelOptions::default())
        .unwrap();
    let k = assemble(&p.mesh, &ks, 1);
    let (k, f) =
        apply_boundary_conditions(&k, &p.boundary_conditions, &p.mesh, 1.0, PhysicsMode::Diffusion)
            .unwrap();
    let t = solve(k, f);

    // k dT/dx = 2 at x = 1, T = 0 at x = 0
    for (i, node) in p.mesh.nodes().iter().enumerate() {
        assert_relative_eq!(t[i], node[0], epsilon = 1e-10);
    }

    let qx = centroid_field(&p.mesh, t.as_slice(), Some(&material), PhysicsMode::Diffusion, FieldOutput::FluxX)
        .unwrap();
    for value in qx {
        assert_relative_eq!(value, -2.0, epsilon = 1e-9);
    }

    let samples = sample_field(
        &p.mesh,
        t.as_slice(),
        None,
        PhysicsMode::Diffusion,
        None,
        &SampleOptions::default(),
    )
    .unwrap();
    assert_relative_eq!(samples.min, 0.0, epsilon = 1e-10);
    assert_relative_eq!(samples.max, 1.0, epsilon = 1e-10);
}

#[test]
fn convection_balances_conduction() {
    // T = 0 on the left, convection to T∞ = 10 with h = 1 on the right.
    // 1D solution: T(x) = T∞ h x / (k + h) with k = 1.
    let mesh = unit_square();
    let bcs = vec![
        BoundaryCondition::line(4, 1, BoundaryKind::Temperature, 0.0).unwrap(),
        BoundaryCondition::line(2, 3, BoundaryKind::Convection, 10.0)
            .unwrap()
            .with_coefficient(1.0)
            .unwrap(),
    ];
    let material = Material::diffusive(1.0).unwrap();
    let ks = element_stiffnesses(&mesh, &material, PhysicsMode::Diffusion, KernelOptions::default())
        .unwrap();
    let k = assemble(&mesh, &ks, 1);
    let (k, f) = apply_boundary_conditions(&k, &bcs, &mesh, 1.0, PhysicsMode::Diffusion).unwrap();
    let t = solve(k, f);

    assert_relative_eq!(t[1], 5.0, epsilon = 1e-10);
    assert_relative_eq!(t[2], 5.0, epsilon = 1e-10);
    assert_relative_eq!(t[0], 0.0);
}

#[test]
fn uniaxial_tension_patch() {
    let mesh = unit_square();
    let material = Material::elastic(1.0, 0.0).unwrap();
    let mode = PhysicsMode::PlaneStress;

    let loads = vec![LineLoad::new(2, 3, Direction::Normal, LoadProfile::Uniform(1.0))];
    let constraints = vec![Constraint::xy(1, 0.0, 0.0), Constraint::x(4, 0.0)];

    let q = quadrisect(&mesh, &[], &constraints, &loads).unwrap();
    let ks = element_stiffnesses(&q.mesh, &material, mode, KernelOptions::default()).unwrap();
    let mut k = assemble(&q.mesh, &ks, 2);
    let mut f = structural_forces(&q.mesh, &[], &q.line_loads).unwrap();

    // the left edge midpoint inherits the x constraint
    assert_eq!(q.constraints.len(), 3);
    for c in &q.constraints {
        let base = 2 * q.mesh.local(c.node()).unwrap();
        for (dof, value) in [(base, c.dx()), (base + 1, c.dy())] {
            if let Some(value) = value {
                k.row_mut(dof).fill(0.0);
                k[(dof, dof)] = 1.0;
                f[dof] = value;
            }
        }
    }
    let u = solve(k, f);

    for (i, node) in q.mesh.nodes().iter().enumerate() {
        assert_relative_eq!(u[2 * i], node[0], epsilon = 1e-10);
        assert_relative_eq!(u[2 * i + 1], 0.0, epsilon = 1e-10);
    }

    let sigma = centroid_field(&q.mesh, u.as_slice(), Some(&material), mode, FieldOutput::SigmaX).unwrap();
    assert_eq!(sigma.len(), 8);
    for s in sigma {
        assert_relative_eq!(s, 1.0, epsilon = 1e-10);
    }
}
